#![allow(dead_code)]

use permspace::{Boundary, Namespace, PermutationSpace, SpaceBuilder, Value};
use serde_json::json;

/// Three-level numbering space: `arabic` x `letter_lower` x `roman_lower`,
/// with chained dependent names and one constant.
pub fn numbering_builder() -> SpaceBuilder {
    PermutationSpace::builder(["arabic", "letter_lower", "roman_lower"])
        .independent("arabic", 1..4)
        .independent("letter_lower", ["a", "b", "c"])
        .independent("roman_lower", ["i", "ii", "iii"])
        .dependent("question_name", ["arabic"], |args| {
            Ok(json!(args.i64("arabic")?.to_string()))
        })
        .dependent("part_name", ["question_name", "letter_lower"], |args| {
            Ok(json!(format!(
                "{}.{}",
                args.str("question_name")?,
                args.str("letter_lower")?
            )))
        })
        .dependent("subpart_name", ["part_name", "roman_lower"], |args| {
            Ok(json!(format!(
                "{}.{}",
                args.str("part_name")?,
                args.str("roman_lower")?
            )))
        })
        .constant("constant", "constant")
}

pub fn numbering_space() -> PermutationSpace {
    numbering_builder().build().expect("numbering space")
}

pub fn boundary(pairs: &[(&str, Value)]) -> Boundary {
    pairs
        .iter()
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect()
}

pub fn collect<I>(iter: I) -> Vec<Namespace>
where
    I: IntoIterator<Item = Result<Namespace, permspace::PermspaceError>>,
{
    iter.into_iter()
        .collect::<Result<Vec<_>, _>>()
        .expect("pass succeeds")
}

pub fn indices(namespaces: &[Namespace]) -> Vec<u64> {
    namespaces.iter().map(Namespace::index).collect()
}
