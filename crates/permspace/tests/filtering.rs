mod common;

use std::collections::{BTreeMap, BTreeSet};

use common::{collect, indices, numbering_space};
use permspace::{Filter, PermspaceError, PermutationSpace};
use serde_json::json;

#[test]
fn filter_keeps_the_matching_subsequence() {
    let space = numbering_space()
        .filter(["arabic"], |args| Ok(args.i64("arabic")? < 3))
        .expect("filter");
    assert_eq!(space.len(), 27);
    assert_eq!(space.exact_len().expect("count"), 18);
}

#[test]
fn accepted_and_rejected_partition_the_enumeration() {
    let base = numbering_space();
    let all = indices(&collect(&base));
    let kept = indices(&collect(
        &base
            .clone()
            .filter(["letter_lower"], |args| Ok(args.str("letter_lower")? != "b"))
            .expect("filter"),
    ));
    let dropped = indices(&collect(
        &base
            .filter(["letter_lower"], |args| Ok(args.str("letter_lower")? == "b"))
            .expect("filter"),
    ));
    assert_eq!(kept.len() + dropped.len(), all.len());
    let mut merged: Vec<u64> = kept.iter().chain(dropped.iter()).copied().collect();
    merged.sort_unstable();
    assert_eq!(merged, all);
    assert!(kept.windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn chained_filters_match_record_store_count() {
    let space = PermutationSpace::builder([
        "random_seed",
        "agent_type",
        "num_transfers",
        "num_albums",
        "max_internal_actions",
    ])
    .independent(
        "random_seed",
        [
            0.35746869278354254,
            0.7368915891545381,
            0.03439267552305503,
            0.21913569678035283,
            0.0664623502695384,
        ],
    )
    .constant("num_episodes", 150_000)
    .constant("eval_frequency", 100)
    .independent("agent_type", ["naive", "kb"])
    .independent("num_albums", [100, 500, 1000, 5000])
    .independent("max_internal_actions", 1..6)
    .constant("data_file", "data/album_decade")
    .independent("num_transfers", 1..6)
    .constant("min_return", -100)
    .constant("save_weights", false)
    .build()
    .expect("space")
    .filter(["num_transfers"], |args| Ok(args.i64("num_transfers")? == 1))
    .expect("filter")
    .filter(["num_albums", "max_internal_actions"], |args| {
        Ok(args.i64("num_albums")? == 5000 || args.i64("max_internal_actions")? == 1)
    })
    .expect("filter")
    .filter(["num_albums", "max_internal_actions"], |args| {
        Ok(!(args.i64("num_albums")? == 5000 && args.i64("max_internal_actions")? == 1))
    })
    .expect("filter");
    assert_eq!(space.len(), 1000);
    assert_eq!(space.exact_len().expect("count"), 70);
}

#[test]
fn filter_if_matches_the_equivalent_disjunction() {
    let base = numbering_space();
    let via_if = collect(
        &base
            .clone()
            .filter_if(
                Filter::new(["arabic"], |args| Ok(args.i64("arabic")? == 2)),
                Filter::new(["roman_lower"], |args| Ok(args.str("roman_lower")? == "ii")),
            )
            .expect("filter_if"),
    );
    let via_filter = collect(
        &base
            .filter(["arabic", "roman_lower"], |args| {
                Ok(args.i64("arabic")? != 2 || args.str("roman_lower")? == "ii")
            })
            .expect("filter"),
    );
    assert_eq!(via_if, via_filter);
    assert_eq!(via_if.len(), 21);
}

fn defaults() -> BTreeMap<String, serde_json::Value> {
    let mut defaults = BTreeMap::new();
    defaults.insert("arabic".to_string(), json!(2));
    defaults.insert("letter_lower".to_string(), json!("b"));
    defaults
}

#[test]
fn filter_orthog_bounds_the_number_of_deviations() {
    let base = numbering_space();
    let exact = collect(&base.clone().filter_orthog(0, defaults()).expect("orthog"));
    assert_eq!(exact.len(), 3);
    assert!(exact
        .iter()
        .all(|ns| ns["arabic"] == json!(2) && ns["letter_lower"] == json!("b")));

    let one_off = collect(&base.filter_orthog(1, defaults()).expect("orthog"));
    // (arabic = 2 or letter = b) over three roman values: (3 + 3 - 1) * 3
    assert_eq!(one_off.len(), 15);
    for ns in &one_off {
        let deviations = usize::from(ns["arabic"] != json!(2))
            + usize::from(ns["letter_lower"] != json!("b"));
        assert!(deviations <= 1);
    }
}

#[test]
fn filter_orthog_zero_with_every_independent_yields_one_point() {
    let mut all_defaults = defaults();
    all_defaults.insert("roman_lower".to_string(), json!("iii"));
    let single = collect(&numbering_space().filter_orthog(0, all_defaults.clone()).expect("orthog"));
    assert_eq!(single.len(), 1);
    assert_eq!(single[0].index(), 14);
    assert_eq!(single[0].uniqstr(), "e");

    all_defaults.insert("arabic".to_string(), json!(9));
    let none = collect(&numbering_space().filter_orthog(0, all_defaults).expect("orthog"));
    assert!(none.is_empty());
}

#[test]
fn rejected_candidates_keep_true_indices() {
    let space = numbering_space()
        .filter(["roman_lower"], |args| Ok(args.str("roman_lower")? == "iii"))
        .expect("filter");
    let kept = indices(&collect(&space));
    let expected: Vec<u64> = (0..27).filter(|index| index % 3 == 2).collect();
    assert_eq!(kept, expected);
}

#[test]
fn filters_added_later_do_not_change_earlier_spaces() {
    let base = numbering_space();
    let narrowed = base
        .clone()
        .filter(["arabic"], |args| Ok(args.i64("arabic")? == 1))
        .expect("filter");
    assert_eq!(base.exact_len().expect("count"), 27);
    assert_eq!(narrowed.exact_len().expect("count"), 9);
    assert_eq!(narrowed.filters().len(), 1);
}

#[test]
fn failing_predicate_aborts_the_pass() {
    let space = numbering_space()
        .filter(["arabic"], |args| {
            if args.i64("arabic")? == 2 {
                Err(PermspaceError::evaluation("predicate-failed", "refusing arabic 2"))
            } else {
                Ok(true)
            }
        })
        .expect("filter");
    let mut pass = space.iter();
    let mut ok = 0;
    let err = loop {
        match pass.next().expect("pass ends with an error") {
            Ok(_) => ok += 1,
            Err(err) => break err,
        }
    };
    assert_eq!(ok, 9);
    assert_eq!(err.info().code, "predicate-failed");
    assert!(pass.next().is_none());
    assert!(space.exact_len().is_err());
}

#[test]
fn failing_dependent_propagates_its_error() {
    let space = PermutationSpace::builder(["x"])
        .independent("x", [1, 2, 3])
        .dependent("inverse", ["x"], |args| {
            let x = args.i64("x")?;
            if x == 3 {
                return Err(PermspaceError::evaluation("no-inverse", "x is three")
                    .with_context("x", x));
            }
            Ok(json!(1.0 / x as f64))
        })
        .build()
        .expect("space");
    let results: Vec<_> = space.iter().collect();
    assert_eq!(results.len(), 3);
    assert!(results[0].is_ok() && results[1].is_ok());
    let err = results[2].as_ref().expect_err("third fails");
    assert_eq!(err.info().code, "no-inverse");
    assert_eq!(err.info().context.get("x").map(String::as_str), Some("3"));
}

#[test]
fn type_mismatch_inside_a_dependent_is_an_evaluation_error() {
    let space = PermutationSpace::builder(["letter"])
        .independent("letter", ["a"])
        .dependent("broken", ["letter"], |args| Ok(json!(args.i64("letter")?)))
        .build()
        .expect("space");
    let first = space.iter().next().expect("one result");
    assert!(matches!(first, Err(PermspaceError::Evaluation(_))));
}

#[test]
fn filter_sees_only_declared_arguments() {
    let space = numbering_space()
        .filter(["arabic"], |args| Ok(args.get("letter_lower").is_err()))
        .expect("filter");
    let seen: BTreeSet<_> = collect(&space).iter().map(|ns| ns.index()).collect();
    assert_eq!(seen.len(), 27);
}
