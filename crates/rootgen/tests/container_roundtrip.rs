//! Integration tests: session serialization through the container seam.

use rootgen::{
    EventWriter, Hist1D, Hist2D, LeafType, MemoryContainer, SchemaBuilder, Session, WriteOptions,
};

fn build_session() -> Session {
    let mut b = SchemaBuilder::new();
    b.scalar("I32", LeafType::I32).unwrap();
    b.fixed_array("ArrF64", LeafType::F64, 3).unwrap();
    b.scalar("N", LeafType::I32).unwrap();
    b.var_array("SliU64", LeafType::U64, "N").unwrap();
    let mut w = EventWriter::new("tree", "fixture tree", b.finish());

    for i in 0..10u64 {
        let n = (i % 3) as usize;
        w.stage("I32", i as i32).unwrap();
        w.stage("ArrF64", vec![i as f64; 3]).unwrap();
        w.stage("N", n as i32).unwrap();
        w.stage("SliU64", vec![i; n]).unwrap();
        w.commit().unwrap();
    }

    let mut h1 = Hist1D::variable("h1", vec![0.0, 1.5, 2.0, 3.0]).unwrap();
    h1.set_stat_overflows(true).unwrap();
    h1.fill(1.6, 2.0).unwrap();
    h1.fill(5.0, 1.0).unwrap();

    let mut h2 = Hist2D::fixed("h2", 2, 0.0, 2.0, 2, 0.0, 2.0).unwrap();
    h2.fill(0.5, 1.5, 1.0).unwrap();

    let mut session = Session::new();
    session.record_tree(w.finish());
    session.record_h1(h1);
    session.record_h2(h2);
    session
}

#[test]
fn leaflist_grammar_reproduced_exactly() {
    let mut out = MemoryContainer::new(WriteOptions::default());
    build_session().write_to(&mut out).unwrap();

    let tree = out.tree("tree").unwrap();
    let leaflists: Vec<&str> = tree.branches.iter().map(|b| b.leaflist.as_str()).collect();
    assert_eq!(leaflists, vec!["I32/I", "ArrF64[3]/D", "N/I", "SliU64[N]/l"]);
}

#[test]
fn var_rows_truncated_to_counter_width() {
    let mut out = MemoryContainer::new(WriteOptions::default());
    build_session().write_to(&mut out).unwrap();

    let tree = out.tree("tree").unwrap();
    let slices = &tree.branches[3];
    assert_eq!(slices.rows.len(), 10);
    for (i, row) in slices.rows.iter().enumerate() {
        assert_eq!(row.len(), i % 3);
    }
}

#[test]
fn histogram_state_written_with_flow_slots() {
    let mut out = MemoryContainer::new(WriteOptions::default());
    build_session().write_to(&mut out).unwrap();

    let h1 = out.hist("h1").unwrap();
    assert_eq!(h1.descriptor.x_edges, vec![0.0, 1.5, 2.0, 3.0]);
    // [under, b0, b1, b2, over]
    assert_eq!(h1.contents, vec![0.0, 0.0, 2.0, 0.0, 1.0]);
    assert_eq!(h1.sumw2, vec![0.0, 0.0, 4.0, 0.0, 1.0]);
    assert!(h1.stat_overflows);
    assert_eq!(h1.stats.entries, 2);
    assert_eq!(h1.stats.sum_w, 3.0);
    assert_eq!(h1.stats.sum_wx, 2.0 * 1.6 + 5.0);

    let h2 = out.hist("h2").unwrap();
    assert_eq!(h2.descriptor.y_edges.as_deref(), Some(&[0.0, 1.0, 2.0][..]));
    assert_eq!(h2.contents.len(), 16);
    assert_eq!(h2.contents[1 + 4 * 2], 1.0);
    assert_eq!(h2.stats.sum_wxy, 0.75);
}

#[test]
fn identical_runs_serialize_identically() {
    let mut a = MemoryContainer::new(WriteOptions::default());
    build_session().write_to(&mut a).unwrap();
    let mut b = MemoryContainer::new(WriteOptions::default());
    build_session().write_to(&mut b).unwrap();

    assert_eq!(a.to_json().unwrap(), b.to_json().unwrap());
}

#[test]
fn open_options_recorded() {
    let mut out = MemoryContainer::new(WriteOptions {
        compressed: true,
        title: "golden fixture".to_string(),
    });
    build_session().write_to(&mut out).unwrap();
    assert!(out.doc().compressed);
    assert_eq!(out.doc().title, "golden fixture");
}
