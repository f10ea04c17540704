/* tests/bean_tests.rs */

use std::collections::BTreeMap;

use trellis::codec::Tag;
use trellis::entry::{AnyValue, BuildError, EntryBuilder, EntryError};
use trellis::holder::{ConfigRoot, DetachedHolder};
use trellis::kinds::{BeanBuilder, BeanKind, bean, boolean, int, string};
use trellis::message::{MISSING_VALUE, TOO_LARGE};

#[derive(Debug, Clone, PartialEq)]
struct Server {
	host: String,
	port: i32,
	secure: bool,
}

trellis::bean!(Server { host, port, secure });

fn server() -> Server {
	Server {
		host: "localhost".to_string(),
		port: 8080,
		secure: false,
	}
}

fn builder() -> EntryBuilder<BeanBuilder<Server>> {
	bean(server())
		.add("host", string("").non_empty())
		.add("port", int(0).range(1, 65535))
		.add("secure", boolean(false))
}

#[test]
fn test_bean_round_trips_through_holder() {
	let mut root = ConfigRoot::builder().owner("bean_holder").build().unwrap();
	root.add("server", &builder()).unwrap();
	assert_eq!(root.get::<Server>("server").unwrap(), server());

	let changed = Server {
		host: "example.org".to_string(),
		port: 443,
		secure: true,
	};
	assert!(root.set("server", changed.clone()).unwrap());
	assert_eq!(root.get::<Server>("server").unwrap(), changed);

	let invalid = Server { port: 0, ..changed };
	assert!(root.set("server", invalid).is_err());
}

#[test]
fn test_missing_properties_keep_template() {
	let holder = DetachedHolder::new("beans");
	let entry = builder().build(&holder, "s").unwrap();

	let mut compound = BTreeMap::new();
	compound.insert("port".to_string(), Tag::Int(9000));
	compound.insert("host".to_string(), Tag::Bool(true));
	let decoded = entry.from_persisted(&Tag::Compound(compound)).unwrap();
	assert_eq!(decoded.port, 9000);
	assert_eq!(decoded.host, "localhost");
	assert_eq!(entry.from_persisted(&Tag::Int(1)), None);
}

#[test]
fn test_undeclared_property_fails_build() {
	let holder = DetachedHolder::new("beans");
	let partial = bean(server())
		.add("host", string("x"))
		.add("port", int(0));

	match partial.build(&holder, "s").unwrap_err() {
		BuildError::UneditableProperties { properties, .. } => assert_eq!(properties, ["secure"]),
		_ => panic!("Expected UneditableProperties error"),
	}
	let entry = partial.allow_uneditable_properties().build(&holder, "t").unwrap();
	let stored = entry.for_persisted(&server());
	assert!(stored.as_compound().unwrap().get("secure").is_none());
}

#[test]
fn test_unknown_property_fails_build() {
	let holder = DetachedHolder::new("beans");
	match builder().add("foo", int(0)).build(&holder, "s").unwrap_err() {
		BuildError::UnknownProperty { property, .. } => assert_eq!(property, "foo"),
		_ => panic!("Expected UnknownProperty error"),
	}
}

#[test]
fn test_property_type_must_match_entry() {
	let holder = DetachedHolder::new("beans");
	match builder().add("port", string("")).build(&holder, "s").unwrap_err() {
		BuildError::PropertyType { property, expected, .. } => {
			assert_eq!(property, "port");
			assert_eq!(expected, "alloc::string::String");
		}
		_ => panic!("Expected PropertyType error"),
	}
}

#[test]
fn test_temporary_property_is_not_nestable() {
	let holder = DetachedHolder::new("beans");
	match builder().add("port", int(1).temp()).build(&holder, "s").unwrap_err() {
		BuildError::NotNestable { path } => assert_eq!(path, "beans[s][port]"),
		_ => panic!("Expected NotNestable error"),
	}
}

#[test]
fn test_presentation_errors() {
	let holder = DetachedHolder::new("beans");
	let entry = builder().build(&holder, "s").unwrap();

	let mut view = entry.for_presentation(&server());
	view.fields.insert("port".to_string(), AnyValue::new(70000_i32));
	let errors = entry.presentation_errors(&view);
	assert_eq!(errors.len(), 1);
	assert_eq!(errors[0].key(), TOO_LARGE);

	view.fields.shift_remove("secure");
	let errors = entry.presentation_errors(&view);
	assert_eq!(errors[1].key(), MISSING_VALUE);
	assert_eq!(errors[1].args(), ["secure"]);
	assert_eq!(entry.from_presentation(&view), None);
}

#[test]
fn test_from_presentation_starts_from_base() {
	let holder = DetachedHolder::new("beans");
	let entry = bean(server())
		.add("port", int(0))
		.allow_uneditable_properties()
		.build(&holder, "s")
		.unwrap();

	let base = Server {
		host: "kept".to_string(),
		..server()
	};
	let mut view = entry.for_presentation(&base);
	view.fields.insert("port".to_string(), AnyValue::new(1_i32));
	let value = entry.from_presentation(&view).unwrap();
	assert_eq!(value.host, "kept");
	assert_eq!(value.port, 1);
}

#[test]
fn test_property_setters_validate() {
	let holder = DetachedHolder::new("beans");
	let entry = builder().build(&holder, "s").unwrap();
	let kind: &BeanKind<Server> = entry.kind();
	let mut value = server();

	kind.set(&mut value, "port", &AnyValue::new(9090_i32)).unwrap();
	assert_eq!(value.port, 9090);
	assert_eq!(kind.get_presented(&value, "port"), Some(AnyValue::new(9090_i32)));

	match kind.set(&mut value, "port", &AnyValue::new(0_i32)).unwrap_err() {
		EntryError::InvalidValue { path, .. } => assert_eq!(path, "beans[s][port]"),
		_ => panic!("Expected InvalidValue error"),
	}
	assert!(matches!(
		kind.set(&mut value, "port", &AnyValue::new("x".to_string())),
		Err(EntryError::TypeMismatch { .. })
	));
	assert!(matches!(
		kind.set(&mut value, "nope", &AnyValue::new(1_i32)),
		Err(EntryError::NoSuchEntry { .. })
	));

	kind.set_presented(&mut value, "secure", &AnyValue::new(true)).unwrap();
	assert!(value.secure);
	assert_eq!(value.port, 9090);
}

#[test]
fn test_caption_property_comes_first() {
	let holder = DetachedHolder::new("beans");
	let entry = bean(server())
		.add("port", int(0))
		.add("secure", boolean(false))
		.caption("host", string(""))
		.build(&holder, "s")
		.unwrap();

	let kind = entry.kind();
	assert_eq!(kind.caption(), Some("host"));
	assert_eq!(kind.property_names().collect::<Vec<_>>(), ["host", "port", "secure"]);
	assert!(kind.entry("host").is_some());
}
