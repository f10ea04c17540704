/* tests/tuple_tests.rs */

use std::collections::BTreeMap;

use indexmap::IndexMap;
use trellis::codec::Tag;
use trellis::entry::KeyKind;
use trellis::holder::{ConfigRoot, DetachedHolder};
use trellis::kinds::{NumberKind, PairKind, StringKind, boolean, int, map, pair, string, triple};
use trellis::message::{TOO_LARGE, TOO_SHORT};

fn slots(pairs: &[(&str, Tag)]) -> Tag {
	Tag::Compound(
		pairs
			.iter()
			.map(|(name, tag)| (name.to_string(), tag.clone()))
			.collect::<BTreeMap<_, _>>(),
	)
}

#[test]
fn test_pair_defaults_come_from_slots() {
	let builder = pair(string("host"), int(80));
	assert_eq!(builder.default_value(), &("host".to_string(), 80));
}

#[test]
fn test_pair_persists_as_named_slots() {
	let holder = DetachedHolder::new("tuples");
	let entry = pair(string("a"), int(1)).build(&holder, "p").unwrap();

	let tag = entry.for_persisted(&("x".to_string(), 5));
	assert_eq!(tag, slots(&[("l", Tag::String("x".into())), ("r", Tag::Int(5))]));
	assert_eq!(entry.from_persisted(&tag), Some(("x".to_string(), 5)));
}

#[test]
fn test_list_shaped_tags_are_accepted() {
	let holder = DetachedHolder::new("tuples");
	let entry = pair(string("a"), int(1)).build(&holder, "p").unwrap();

	let tag = Tag::List(vec![Tag::String("y".into()), Tag::String("z".into())]);
	assert_eq!(entry.from_persisted(&tag), Some(("y".to_string(), 1)));
	let short = Tag::List(vec![Tag::String("y".into())]);
	assert_eq!(entry.from_persisted(&short), None);
}

#[test]
fn test_failed_slot_uses_its_default() {
	let holder = DetachedHolder::new("tuples");
	let entry = pair(string("a"), int(1)).build(&holder, "p").unwrap();

	let tag = slots(&[("l", Tag::Bool(true)), ("r", Tag::Int(9))]);
	assert_eq!(entry.from_persisted(&tag), Some(("a".to_string(), 9)));

	let tag = slots(&[("l", Tag::Bool(true))]);
	assert_eq!(entry.from_persisted(&tag), None);
	assert_eq!(entry.from_persisted_or_default(&tag), ("a".to_string(), 1));
	assert_eq!(entry.from_persisted(&Tag::Int(3)), None);
}

#[test]
fn test_triple_uses_middle_slot() {
	let holder = DetachedHolder::new("tuples");
	let entry = triple(int(0), boolean(false), string("s"))
		.build(&holder, "t")
		.unwrap();

	let tag = entry.for_persisted(&(1, true, "x".to_string()));
	assert_eq!(tag.as_compound().unwrap()["m"], Tag::Bool(true));
	let tag = slots(&[("m", Tag::Bool(true))]);
	assert_eq!(entry.from_persisted(&tag), Some((0, true, "s".to_string())));
	assert_eq!(entry.kind().middle().path(), "tuples[t][m]");
}

#[test]
fn test_slot_errors_are_concatenated() {
	let holder = DetachedHolder::new("tuples");
	let entry = triple(int(0).max(5), boolean(false), string("s").non_empty())
		.build(&holder, "t")
		.unwrap();

	let errors = entry.errors(&(9, false, String::new()));
	assert_eq!(errors.len(), 2);
	assert_eq!(errors[0].key(), TOO_LARGE);
	assert_eq!(errors[1].key(), TOO_SHORT);
}

#[test]
fn test_pair_as_map_key() {
	let holder = DetachedHolder::new("tuples");
	let key = pair(string(""), int(0));
	let entry = map(key, boolean(false), IndexMap::new())
		.linked()
		.build(&holder, "m")
		.unwrap();

	let mut value = IndexMap::new();
	value.insert(("b".to_string(), 2), true);
	value.insert(("a".to_string(), 1), false);
	let decoded = entry.from_persisted(&entry.for_persisted(&value)).unwrap();
	assert_eq!(decoded.keys().collect::<Vec<_>>(), value.keys().collect::<Vec<_>>());
	assert!(decoded[&("b".to_string(), 2)]);
}

#[test]
fn test_pair_key_rejects_foreign_text() {
	let holder = DetachedHolder::new("tuples");
	let entry = pair(string(""), int(0)).build(&holder, "k").unwrap();
	let kind: &PairKind<StringKind, NumberKind<i32>> = entry.kind();

	assert_eq!(kind.deserialize_string_key("garbage"), None);
	assert_eq!(kind.deserialize_string_key(&Tag::Int(1).to_text()), None);
	let text = kind.serialize_string_key(&entry.for_persisted(&("q".to_string(), 4)));
	assert!(kind.deserialize_string_key(&text).is_some());
}

#[test]
fn test_pair_through_holder() {
	let mut root = ConfigRoot::builder().owner("tuple_holder").build().unwrap();
	root.add("endpoint", &pair(string("localhost"), int(80).range(1, 65535)))
		.unwrap();

	assert!(root.set("endpoint", ("example.org".to_string(), 443_i32)).unwrap());
	assert!(root.set("endpoint", ("example.org".to_string(), 0_i32)).is_err());
	assert_eq!(
		root.get::<(String, i32)>("endpoint").unwrap(),
		("example.org".to_string(), 443)
	);
}
