#![allow(dead_code)]

//! The path-addressed patch engine.
//!
//! A field path is a dot-separated chain of member names, each optionally
//! carrying one `[index]` suffix: `hero.title`, `values[2].description`.
//! The engine resolves the path against a page subtree and overwrites the
//! addressed leaf. Nothing is auto-vivified: every intermediate must already
//! exist with the right shape, indexes must be in bounds, and any miss
//! (malformed paths included) is `PathNotFound`. Resolution completes
//! before the single write, so a failed patch leaves the input unchanged.

use serde_json::Value;

use crate::content::store::ContentError;

struct PathSegment<'a> {
    member: &'a str,
    index: Option<usize>,
}

/// Sets the value at `path` inside `root` (a page subtree).
pub fn set_at_path(root: &mut Value, path: &str, value: Value) -> Result<(), ContentError> {
    let not_found = || ContentError::PathNotFound(path.to_string());

    let segments = parse_path(path).ok_or_else(not_found)?;
    let (last, intermediates) = segments.split_last().expect("parse_path yields >= 1 segment");

    let mut current = root;
    for segment in intermediates {
        current = descend(current, segment).ok_or_else(not_found)?;
    }

    match last.index {
        Some(i) => {
            let slot = current
                .get_mut(last.member)
                .and_then(Value::as_array_mut)
                .and_then(|list| list.get_mut(i))
                .ok_or_else(not_found)?;
            *slot = value;
        }
        None => {
            // The final member is the one spot where assignment may insert:
            // the rendering layer declares leaf fields, not the engine.
            let object = current.as_object_mut().ok_or_else(not_found)?;
            object.insert(last.member.to_string(), value);
        }
    }

    Ok(())
}

/// Read-only resolution of a full path, used to snapshot a field's current
/// value before editing. Same grammar and miss semantics as `set_at_path`.
pub fn value_at_path<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    let segments = parse_path(path)?;

    let mut current = root;
    for segment in &segments {
        let member = current.as_object()?.get(segment.member)?;
        current = match segment.index {
            Some(i) => member.as_array()?.get(i)?,
            None => member,
        };
    }
    Some(current)
}

fn descend<'a>(current: &'a mut Value, segment: &PathSegment<'_>) -> Option<&'a mut Value> {
    let member = current.as_object_mut()?.get_mut(segment.member)?;
    match segment.index {
        Some(i) => member.as_array_mut()?.get_mut(i),
        None => Some(member),
    }
}

fn parse_path(path: &str) -> Option<Vec<PathSegment<'_>>> {
    if path.is_empty() {
        return None;
    }
    path.split('.').map(parse_segment).collect()
}

fn parse_segment(raw: &str) -> Option<PathSegment<'_>> {
    match raw.find('[') {
        None => {
            if raw.is_empty() {
                None
            } else {
                Some(PathSegment {
                    member: raw,
                    index: None,
                })
            }
        }
        Some(open) => {
            let member = &raw[..open];
            let index = raw[open + 1..].strip_suffix(']')?;
            if member.is_empty() || index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            let index: usize = index.parse().ok()?;
            Some(PathSegment {
                member,
                index: Some(index),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn page() -> Value {
        json!({
            "hero": {"title": "A", "subtitle": "S"},
            "values": [
                {"title": "B", "description": "D0"},
                {"title": "B1", "description": "D1"}
            ],
            "platforms": {
                "items": [{"features": [{"title": "F"}]}]
            }
        })
    }

    #[test]
    fn test_set_scalar_member() {
        let mut tree = page();
        set_at_path(&mut tree, "hero.title", json!("New")).unwrap();

        assert_eq!(tree["hero"]["title"], "New");
        assert_eq!(tree["hero"]["subtitle"], "S");
    }

    #[test]
    fn test_set_list_element_member_changes_only_that_field() {
        let mut tree = page();
        set_at_path(&mut tree, "values[0].title", json!("C")).unwrap();

        assert_eq!(tree["values"][0]["title"], "C");
        assert_eq!(tree["values"][0]["description"], "D0");
        assert_eq!(tree["values"][1]["title"], "B1");
        assert_eq!(tree["hero"]["title"], "A");
    }

    #[test]
    fn test_set_through_nested_lists() {
        let mut tree = page();
        set_at_path(&mut tree, "platforms.items[0].features[0].title", json!("G")).unwrap();
        assert_eq!(tree["platforms"]["items"][0]["features"][0]["title"], "G");
    }

    #[test]
    fn test_final_indexed_slot_assignment() {
        let mut tree = json!({"tags": ["a", "b"]});
        set_at_path(&mut tree, "tags[1]", json!("z")).unwrap();
        assert_eq!(tree, json!({"tags": ["a", "z"]}));
    }

    #[test]
    fn test_index_out_of_bounds_fails_unmutated() {
        let mut tree = page();
        let before = tree.clone();

        let err = set_at_path(&mut tree, "values[5].title", json!("C")).unwrap_err();
        assert!(matches!(err, ContentError::PathNotFound(p) if p == "values[5].title"));
        assert_eq!(tree, before);
    }

    #[test]
    fn test_missing_intermediate_is_not_created() {
        let mut tree = page();
        let before = tree.clone();

        assert!(set_at_path(&mut tree, "footer.text", json!("x")).is_err());
        assert_eq!(tree, before);
    }

    #[test]
    fn test_member_access_on_list_fails() {
        let mut tree = page();
        // `values` is a list; descending by member name must not work.
        assert!(set_at_path(&mut tree, "values.title", json!("x")).is_err());
    }

    #[test]
    fn test_index_on_non_list_fails() {
        let mut tree = page();
        assert!(set_at_path(&mut tree, "hero[0]", json!("x")).is_err());
        assert!(set_at_path(&mut tree, "hero[0].title", json!("x")).is_err());
    }

    #[test]
    fn test_member_on_scalar_fails() {
        let mut tree = page();
        assert!(set_at_path(&mut tree, "hero.title.inner", json!("x")).is_err());
    }

    #[test]
    fn test_malformed_paths_are_path_not_found() {
        let mut tree = page();
        let before = tree.clone();

        for path in [
            "",
            ".",
            "hero.",
            ".hero",
            "values[",
            "values[]",
            "values[x]",
            "values[0",
            "values[0]x",
            "[0]",
            "values[-1]",
        ] {
            let err = set_at_path(&mut tree, path, json!("x")).unwrap_err();
            assert!(
                matches!(err, ContentError::PathNotFound(_)),
                "path {path:?} should be PathNotFound"
            );
        }
        assert_eq!(tree, before);
    }

    #[test]
    fn test_final_member_insert_on_existing_object() {
        let mut tree = page();
        set_at_path(&mut tree, "hero.badge", json!("New!")).unwrap();
        assert_eq!(tree["hero"]["badge"], "New!");
    }

    #[test]
    fn test_value_at_path_reads() {
        let tree = page();
        assert_eq!(value_at_path(&tree, "hero.title"), Some(&json!("A")));
        assert_eq!(value_at_path(&tree, "values[1].description"), Some(&json!("D1")));
        assert_eq!(
            value_at_path(&tree, "platforms.items[0].features[0].title"),
            Some(&json!("F"))
        );

        assert_eq!(value_at_path(&tree, "values[5].title"), None);
        assert_eq!(value_at_path(&tree, "footer.text"), None);
        assert_eq!(value_at_path(&tree, "values["), None);
    }
}
