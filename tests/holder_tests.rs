/* tests/holder_tests.rs */

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use trellis::backend::{BackendError, MemoryBackend};
use trellis::codec::Tag;
use trellis::entry::{Backing, BackingError, BuildError, EntryError, SharedBacking};
use trellis::holder::{ConfigRoot, HolderError, Phase, RootId, RootKind, registry};
use trellis::kinds::{NumberKind, boolean, int, string};

/// Backing state that always fails.
struct Broken;

impl Backing<i32> for Broken {
	fn load(&self) -> Result<i32, BackingError> {
		Err("device unplugged".into())
	}

	fn store(&self, _value: &i32) -> Result<(), BackingError> {
		Err("read-only".into())
	}
}

fn tree(owner: &str) -> ConfigRoot {
	let mut root = ConfigRoot::builder().owner(owner).build().unwrap();
	root.add("name", &string("guest")).unwrap();
	let net = root.group("net").unwrap();
	net.add("port", &int(8080)).unwrap();
	net.add("tls", &boolean(false).restart()).unwrap();
	net.group("proxy").unwrap().add("host", &string("")).unwrap();
	root
}

#[test]
fn test_path_resolution() {
	let mut root = tree("holder_paths");
	assert_eq!(root.get::<i32>("net.port").unwrap(), 8080);
	root.set("net.proxy.host", "example.org".to_string()).unwrap();
	assert_eq!(root.get::<String>("net.proxy.host").unwrap(), "example.org");
	assert_eq!(root.child("net.proxy").unwrap().path(), "net.proxy");
	assert_eq!(
		root.entry::<NumberKind<i32>>("net.port").unwrap().path(),
		"net.port"
	);
	assert!(root.has_entry("net.tls"));
	assert!(!root.has_entry("net"));
	assert!(root.has_child("net"));
}

#[test]
fn test_missing_entry_and_group_are_distinct() {
	let root = tree("holder_missing");

	match root.get::<i32>("net.nope").unwrap_err() {
		EntryError::NoSuchEntry { path } => assert_eq!(path, "net.nope"),
		_ => panic!("Expected NoSuchEntry error"),
	}
	match root.get::<i32>("nope.port").unwrap_err() {
		EntryError::NoSuchGroup { path } => assert_eq!(path, "nope"),
		_ => panic!("Expected NoSuchGroup error"),
	}
	match root.get::<i32>("net.proxy.deeper.x").unwrap_err() {
		EntryError::NoSuchGroup { path } => assert_eq!(path, "net.proxy.deeper"),
		_ => panic!("Expected NoSuchGroup error"),
	}
}

#[test]
fn test_type_mismatch_is_reported() {
	let mut root = tree("holder_mismatch");

	match root.set("net.port", "8080".to_string()).unwrap_err() {
		EntryError::TypeMismatch { path, expected, .. } => {
			assert_eq!(path, "net.port");
			assert_eq!(expected, "i32");
		}
		_ => panic!("Expected TypeMismatch error"),
	}
	assert!(matches!(
		root.get::<i64>("net.port"),
		Err(EntryError::TypeMismatch { .. })
	));
	assert!(root.entry::<NumberKind<i64>>("net.port").is_err());
}

#[test]
fn test_duplicate_names_fail() {
	let mut root = tree("holder_duplicate");
	match root.add("net", &int(0)).unwrap_err() {
		BuildError::Duplicate { path } => assert_eq!(path, "net"),
		_ => panic!("Expected Duplicate error"),
	}
	assert!(matches!(root.group("name"), Err(BuildError::Duplicate { .. })));
	assert!(matches!(
		root.add("a.b", &int(0)),
		Err(BuildError::InvalidName { .. })
	));
}

#[test]
fn test_dirty_propagates_up_and_clears_down() {
	let mut root = tree("holder_dirty");
	root.set("net.proxy.host", "h".to_string()).unwrap();

	assert!(root.is_dirty());
	assert!(root.child("net").unwrap().is_dirty());
	assert!(root.child("net.proxy").unwrap().is_dirty());
	assert!(!root.any_entry("name").unwrap().is_dirty());

	root.mark_dirty(false);
	assert!(!root.is_dirty());
	assert!(!root.child("net").unwrap().is_dirty());
	assert!(!root.child("net.proxy").unwrap().is_dirty());
	assert!(!root.any_entry("net.proxy.host").unwrap().is_dirty());

	root.any_entry("net.port").unwrap().mark_dirty(true);
	assert!(root.is_dirty());
	assert!(!root.child("net.proxy").unwrap().is_dirty());
}

#[test]
fn test_restart_tracking() {
	let mut root = tree("holder_restart");
	root.set("net.port", 1_i32).unwrap();
	assert!(!root.any_dirty_requires_restart());
	root.set("net.tls", true).unwrap();
	assert!(root.any_dirty_requires_restart());
}

#[test]
fn test_paths_and_reset() {
	let mut root = tree("holder_reset");
	assert_eq!(
		root.paths(false),
		["name", "net.port", "net.tls", "net.proxy.host"]
	);
	assert_eq!(
		root.paths(true),
		["name", "net", "net.port", "net.tls", "net.proxy", "net.proxy.host"]
	);

	root.set("name", "x".to_string()).unwrap();
	root.set("net.port", 1_i32).unwrap();
	root.reset_path("net").unwrap();
	assert_eq!(root.get::<i32>("net.port").unwrap(), 8080);
	assert_eq!(root.get::<String>("name").unwrap(), "x");
	root.reset().unwrap();
	assert_eq!(root.get::<String>("name").unwrap(), "guest");
}

#[test]
fn test_commit_and_bake_with_shared_backing() {
	let cell = SharedBacking::new(3_i32);
	let mut root = ConfigRoot::builder().owner("holder_backing").build().unwrap();
	root.group("g")
		.unwrap()
		.add("n", &int(0).backing(cell.clone()))
		.unwrap();

	root.commit().unwrap();
	assert_eq!(root.get::<i32>("g.n").unwrap(), 3);

	root.set("g.n", 9_i32).unwrap();
	assert_eq!(*cell.get(), 3);
	root.bake().unwrap();
	assert_eq!(*cell.get(), 9);
}

#[test]
fn test_backing_failures_are_aggregated() {
	let mut root = ConfigRoot::builder().owner("holder_broken").build().unwrap();
	root.add("a", &int(0).backing(Broken)).unwrap();
	root.group("g").unwrap().add("b", &int(0).backing(Broken)).unwrap();

	match root.commit().unwrap_err() {
		HolderError::Backing { phase, failures } => {
			assert_eq!(phase, Phase::Commit);
			let paths: Vec<&str> = failures.iter().map(|f| f.path.as_str()).collect();
			assert_eq!(paths, ["g.b", "a"]);
			assert_eq!(failures[0].cause, "device unplugged");
		}
	}
	match root.bake().unwrap_err() {
		HolderError::Backing { phase, failures } => {
			assert_eq!(phase, Phase::Bake);
			assert_eq!(failures.len(), 2);
		}
	}
}

#[test]
fn test_baker_runs_after_children() {
	let calls = Arc::new(AtomicUsize::new(0));
	let seen = Arc::clone(&calls);
	let mut root = ConfigRoot::builder().owner("holder_baker").build().unwrap();
	root.add("n", &int(4)).unwrap();
	root.set_baker(move |holder| {
		seen.fetch_add(1, Ordering::SeqCst);
		match holder.get::<i32>("n")? {
			4 => Ok(()),
			other => Err(format!("unexpected {other}").into()),
		}
	});

	root.bake().unwrap();
	assert_eq!(calls.load(Ordering::SeqCst), 1);

	root.set("n", 5_i32).unwrap();
	match root.bake().unwrap_err() {
		HolderError::Backing { failures, .. } => {
			assert_eq!(failures[0].path, "holder_baker");
			assert_eq!(failures[0].cause, "unexpected 5");
		}
	}
}

#[test]
fn test_duplicate_root_is_rejected_until_dropped() {
	let id = RootId {
		owner: "holder_registry".to_string(),
		kind: RootKind::Client,
	};
	let first = ConfigRoot::builder()
		.owner("holder_registry")
		.kind(RootKind::Client)
		.build()
		.unwrap();
	assert_eq!(first.id(), &id);
	assert!(registry().contains(&id));

	match ConfigRoot::builder()
		.owner("holder_registry")
		.kind(RootKind::Client)
		.build()
		.unwrap_err()
	{
		BuildError::DuplicateRoot { id } => assert_eq!(id, "holder_registry-client"),
		_ => panic!("Expected DuplicateRoot error"),
	}
	let server = ConfigRoot::builder()
		.owner("holder_registry")
		.kind(RootKind::Server)
		.build()
		.unwrap();

	drop(first);
	assert!(!registry().contains(&id));
	ConfigRoot::builder()
		.owner("holder_registry")
		.kind(RootKind::Client)
		.build()
		.unwrap();
	drop(server);
}

#[test]
fn test_shared_backend_rejects_second_definition() {
	let backend = Arc::new(MemoryBackend::new());
	let mut first = ConfigRoot::builder()
		.owner("holder_shared_a")
		.backend(backend.clone())
		.build()
		.unwrap();
	let mut second = ConfigRoot::builder()
		.owner("holder_shared_b")
		.backend(backend)
		.build()
		.unwrap();
	first.add("port", &int(80)).unwrap();

	match second.add("port", &int(0).max(10)).unwrap_err() {
		BuildError::Backend(BackendError::AlreadyDefined { key }) => assert_eq!(key, "port"),
		_ => panic!("Expected AlreadyDefined error"),
	}
	assert!(!second.has_entry("port"));
	first.set("port", 8080_i32).unwrap();
	assert_eq!(first.get::<i32>("port").unwrap(), 8080);
}

#[test]
fn test_root_requires_owner() {
	match ConfigRoot::builder().build().unwrap_err() {
		BuildError::Builder(message) => assert_eq!(message, "owner is required"),
		_ => panic!("Expected Builder error"),
	}
}

#[test]
fn test_snapshot_round_trip() {
	let mut source = tree("holder_snapshot_a");
	source.set("net.port", 443_i32).unwrap();
	source.set("net.proxy.host", "p".to_string()).unwrap();
	let snapshot = source.snapshot();

	let mut target = tree("holder_snapshot_b");
	let report = target.load_snapshot(&snapshot);
	assert!(report.failed.is_empty());
	assert!(report.skipped.is_empty());
	assert_eq!(report.loaded.len(), 4);
	assert_eq!(target.get::<i32>("net.port").unwrap(), 443);
	assert_eq!(target.get::<String>("net.proxy.host").unwrap(), "p");
	assert!(target.is_dirty());
}

#[test]
fn test_snapshot_load_reports_bad_entries() {
	let mut root = ConfigRoot::builder().owner("holder_snapshot_bad").build().unwrap();
	root.add("n", &int(0).max(10)).unwrap();
	root.add("t", &int(0).temp()).unwrap();
	root.add("ok", &boolean(false)).unwrap();

	let mut values = BTreeMap::new();
	values.insert("n".to_string(), Tag::Int(50));
	values.insert("t".to_string(), Tag::Int(1));
	values.insert("ghost".to_string(), Tag::Int(1));
	values.insert("ok".to_string(), Tag::Bool(true));
	let report = root.load_snapshot(&Tag::Compound(values));

	assert_eq!(report.loaded, ["ok"]);
	assert_eq!(report.failed.len(), 1);
	assert_eq!(report.failed[0].0, "n");
	assert!(matches!(report.failed[0].1, EntryError::InvalidValue { .. }));
	assert_eq!(report.skipped, ["ghost", "t"]);
	assert!(root.get::<bool>("ok").unwrap());
}
