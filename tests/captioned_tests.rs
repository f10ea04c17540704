/* tests/captioned_tests.rs */

use std::collections::BTreeMap;

use trellis::codec::Tag;
use trellis::entry::KeyKind;
use trellis::holder::{ConfigRoot, DetachedHolder};
use trellis::kinds::{captioned, int, list, string};

fn single(key: &str, tag: Tag) -> Tag {
	let mut compound = BTreeMap::new();
	compound.insert(key.to_string(), tag);
	Tag::Compound(compound)
}

#[test]
fn test_captioned_round_trips_as_single_entry() {
	let holder = DetachedHolder::new("caps");
	let entry = captioned(string("title"), list(int(0), vec![3]))
		.build(&holder, "c")
		.unwrap();
	let value = ("hosts".to_string(), vec![1, 2]);

	let persisted = entry.for_persisted(&value);
	let compound = persisted.as_compound().unwrap();
	assert_eq!(compound.len(), 1);
	let key = entry
		.kind()
		.caption()
		.kind()
		.serialize_string_key(&"hosts".to_string());
	assert_eq!(compound[&key], Tag::List(vec![Tag::Int(1), Tag::Int(2)]));
	assert_eq!(entry.from_persisted(&persisted), Some(value));
}

#[test]
fn test_captioned_rejects_other_shapes() {
	let holder = DetachedHolder::new("caps");
	let entry = captioned(string("title"), list(int(0), vec![3]))
		.build(&holder, "c")
		.unwrap();
	let items = Tag::List(vec![Tag::Int(1)]);

	assert_eq!(entry.from_persisted(&Tag::Compound(BTreeMap::new())), None);
	let mut two = BTreeMap::new();
	two.insert("a".to_string(), items.clone());
	two.insert("b".to_string(), items.clone());
	assert_eq!(entry.from_persisted(&Tag::Compound(two)), None);
	assert_eq!(entry.from_persisted(&items), None);
	assert_eq!(entry.from_persisted(&single("a", Tag::Bool(true))), None);
	assert_eq!(
		entry.from_persisted_or_default(&Tag::Int(1)),
		("title".to_string(), vec![3])
	);
}

#[test]
fn test_captioned_rejects_bad_caption_key() {
	let holder = DetachedHolder::new("caps");
	let entry = captioned(int(0), list(int(0), vec![]))
		.build(&holder, "c")
		.unwrap();

	let items = Tag::List(vec![Tag::Int(4)]);
	assert_eq!(entry.from_persisted(&single("abc", items.clone())), None);
	let key = entry.kind().caption().kind().serialize_string_key(&7);
	assert_eq!(entry.from_persisted(&single(&key, items)), Some((7, vec![4])));
}

#[test]
fn test_captioned_through_holder() {
	let mut root = ConfigRoot::builder().owner("captioned_holder").build().unwrap();
	root.add("group", &captioned(string("main"), list(int(0).max(9), vec![])))
		.unwrap();

	assert!(root.set("group", ("extra".to_string(), vec![1_i32, 2])).unwrap());
	assert_eq!(
		root.get::<(String, Vec<i32>)>("group").unwrap(),
		("extra".to_string(), vec![1, 2])
	);
	assert!(root.set("group", ("extra".to_string(), vec![10_i32])).is_err());
}
