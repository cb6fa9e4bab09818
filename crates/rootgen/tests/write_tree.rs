//! Integration tests: schema declaration and event commits.

use rootgen::{CellValues, EventWriter, FixtureError, LeafType, SchemaBuilder};

fn flat_schema() -> rootgen::TreeSchema {
    let mut b = SchemaBuilder::new();
    b.scalar("I32", LeafType::I32).unwrap();
    b.fixed_array("ArrF64", LeafType::F64, 4).unwrap();
    b.scalar("N", LeafType::I32).unwrap();
    b.var_array("SliF64", LeafType::F64, "N").unwrap();
    b.finish()
}

#[test]
fn identity_scalar_round_trip() {
    let mut b = SchemaBuilder::new();
    b.scalar("I32", LeafType::I32).unwrap();
    let mut w = EventWriter::new("events", "identity", b.finish());

    for i in 0..100i32 {
        w.stage("I32", i).unwrap();
        assert_eq!(w.commit().unwrap(), i as u64);
    }

    let tree = w.finish();
    assert_eq!(tree.entries(), 100);
    let col = tree.column("I32").unwrap();
    for (i, cell) in col.iter().enumerate() {
        assert_eq!(*cell, CellValues::I32(vec![i as i32]));
    }
}

#[test]
fn fixed_array_always_n_wide() {
    let mut w = EventWriter::new("events", "", flat_schema());
    for i in 0..10i32 {
        w.stage("I32", i).unwrap();
        w.stage("ArrF64", vec![f64::from(i); 4]).unwrap();
        w.stage("N", 0i32).unwrap();
        w.stage("SliF64", Vec::<f64>::new()).unwrap();
        w.commit().unwrap();
    }
    let tree = w.finish();
    for cell in tree.column("ArrF64").unwrap() {
        assert_eq!(cell.len(), 4);
    }
}

#[test]
fn var_array_width_tracks_counter() {
    let mut w = EventWriter::new("events", "", flat_schema());
    for i in 0..20u64 {
        let n = (i % 5) as usize;
        w.stage("I32", i as i32).unwrap();
        w.stage("ArrF64", vec![0.0; 4]).unwrap();
        w.stage("N", n as i32).unwrap();
        w.stage("SliF64", vec![i as f64; n]).unwrap();
        w.commit().unwrap();
    }
    let tree = w.finish();
    let counters = tree.column("N").unwrap();
    let slices = tree.column("SliF64").unwrap();
    for (i, (n_cell, s_cell)) in counters.iter().zip(slices).enumerate() {
        let n = (i % 5) as usize;
        assert_eq!(*n_cell, CellValues::I32(vec![n as i32]));
        // read-back yields exactly the counter's width
        assert_eq!(s_cell.len(), n);
    }
}

#[test]
fn failed_commit_appends_nothing() {
    let mut w = EventWriter::new("events", "", flat_schema());

    // first row succeeds
    w.stage("I32", 0i32).unwrap();
    w.stage("ArrF64", vec![0.0; 4]).unwrap();
    w.stage("N", 1i32).unwrap();
    w.stage("SliF64", vec![0.0]).unwrap();
    w.commit().unwrap();

    // incomplete second row: commit must leave the tree untouched
    w.stage("I32", 1i32).unwrap();
    let err = w.commit().unwrap_err();
    assert!(matches!(err, FixtureError::IncompleteRow(_)));

    // complete the row and retry
    w.stage("ArrF64", vec![1.0; 4]).unwrap();
    w.stage("N", 0i32).unwrap();
    w.stage("SliF64", Vec::<f64>::new()).unwrap();
    assert_eq!(w.commit().unwrap(), 1);

    let tree = w.finish();
    assert_eq!(tree.entries(), 2);
    assert_eq!(tree.column("I32").unwrap().len(), 2);
}

#[test]
fn string_branch_round_trip() {
    let mut b = SchemaBuilder::new();
    b.scalar("Str", LeafType::Str).unwrap();
    let mut w = EventWriter::new("events", "", b.finish());
    for i in 0..3 {
        w.stage("Str", format!("evt-{i:03}")).unwrap();
        w.commit().unwrap();
    }
    let tree = w.finish();
    assert_eq!(
        tree.cell("Str", 2).unwrap(),
        &CellValues::Str(vec!["evt-002".to_string()])
    );
}
