use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use vecplot::bag::{
    Bag, Chunk, DataSource, Filter, FunctionFilter, IndexMapFilter, Row, Value, VecSource,
};
use vecplot::PlotError;

fn rows_ff(n: usize) -> Vec<Row> {
    (0..n)
        .map(|i| vec![Value::Float(i as f64), Value::Float(i as f64 * 2.0)])
        .collect()
}

fn sources_for(name: &str, source: VecSource) -> HashMap<String, Box<dyn DataSource>> {
    let mut map: HashMap<String, Box<dyn DataSource>> = HashMap::new();
    map.insert(name.to_string(), Box::new(source));
    map
}

/// Filter that counts how many times `filter_chunk` runs.
struct CountingFilter {
    calls: Rc<Cell<usize>>,
}

impl Filter for CountingFilter {
    fn sink_spec(&self) -> &str {
        "FF"
    }

    fn source_spec(&self) -> &str {
        "FF"
    }

    fn filter_chunk(&self, chunk: &[Row]) -> Chunk {
        self.calls.set(self.calls.get() + 1);
        chunk.to_vec()
    }
}

#[test]
fn expose_name_requires_consistent_specs() {
    let mut bag = Bag::new();
    let a = bag.register_sink("FF").unwrap();
    let b = bag.register_sink("FF").unwrap();
    let c = bag.register_sink("SFF").unwrap();
    bag.expose_sink(a, "data").unwrap();
    // Same spec under the same name is fine.
    bag.expose_sink(b, "data").unwrap();
    // A conflicting spec is a wiring bug.
    let err = bag.expose_sink(c, "data").unwrap_err();
    assert!(matches!(err, PlotError::Wiring(_)));
}

#[test]
fn link_requires_matching_specs() {
    let mut bag = Bag::new();
    let filter = IndexMapFilter::new("FFF", vec![0, 1]).unwrap();
    assert_eq!(filter.source_spec(), "FF");
    let fid = bag.add_filter(Box::new(filter)).unwrap();

    let good = bag.register_sink("FF").unwrap();
    bag.link(fid, good).unwrap();

    let bad = bag.register_sink("FFF").unwrap();
    let err = bag.link(fid, bad).unwrap_err();
    assert!(matches!(err, PlotError::Wiring(_)));
}

#[test]
fn exposed_and_linked_are_mutually_exclusive() {
    let mut bag = Bag::new();
    let fid = bag
        .add_filter(Box::new(CountingFilter {
            calls: Rc::new(Cell::new(0)),
        }))
        .unwrap();
    let sink = bag.register_sink("FF").unwrap();
    bag.expose_sink(sink, "data").unwrap();
    let err = bag.link(fid, sink).unwrap_err();
    assert!(matches!(err, PlotError::Wiring(_)));
}

#[test]
fn start_flushing_validates_the_graph() {
    // A dangling sink: neither exposed nor linked.
    let mut bag = Bag::new();
    let _orphan = bag.register_sink("FF").unwrap();
    let err = bag.start_flushing(HashMap::new()).unwrap_err();
    assert!(matches!(err, PlotError::Wiring(_)));

    // An exposed name with no source supplied.
    let mut bag = Bag::new();
    let sink = bag.register_sink("FF").unwrap();
    bag.expose_sink(sink, "data").unwrap();
    let err = bag.start_flushing(HashMap::new()).unwrap_err();
    assert!(matches!(err, PlotError::Wiring(_)));

    // A source with the wrong spec.
    let mut bag = Bag::new();
    let sink = bag.register_sink("FF").unwrap();
    bag.expose_sink(sink, "data").unwrap();
    let source = VecSource::new("SFF", vec![], 8).unwrap();
    let err = bag.start_flushing(sources_for("data", source)).unwrap_err();
    assert!(matches!(err, PlotError::Wiring(_)));
}

#[test]
fn rounds_deliver_chunks_until_exhausted() {
    let mut bag = Bag::new();
    let sink = bag.register_sink("FF").unwrap();
    bag.expose_sink(sink, "data").unwrap();

    let source = VecSource::new("FF", rows_ff(10), 4).unwrap();
    bag.start_flushing(sources_for("data", source)).unwrap();

    // 10 rows in chunks of 4: rounds of 4, 4, 2.
    let mut sizes = Vec::new();
    while bag.start_new_round() {
        let chunk = bag.get_chunk(sink).unwrap().unwrap();
        sizes.push(chunk.len());
    }
    assert_eq!(sizes, vec![4, 4, 2]);
}

#[test]
fn fan_out_runs_a_filter_once_per_round() {
    let calls = Rc::new(Cell::new(0));
    let mut bag = Bag::new();
    let fid = bag
        .add_filter(Box::new(CountingFilter {
            calls: Rc::clone(&calls),
        }))
        .unwrap();
    bag.expose_sink(bag.filter_input(fid), "data").unwrap();

    // Two independent sinks fed by the same filter.
    let sink_a = bag.register_sink("FF").unwrap();
    let sink_b = bag.register_sink("FF").unwrap();
    bag.link(fid, sink_a).unwrap();
    bag.link(fid, sink_b).unwrap();

    let source = VecSource::new("FF", rows_ff(6), 3).unwrap();
    bag.start_flushing(sources_for("data", source)).unwrap();

    assert!(bag.start_new_round());
    let a = bag.get_chunk(sink_a).unwrap().unwrap();
    let b = bag.get_chunk(sink_b).unwrap().unwrap();
    assert_eq!(a, b);
    assert_eq!(calls.get(), 1);

    // Next round clears the cache and runs the filter once more.
    assert!(bag.start_new_round());
    let _ = bag.get_chunk(sink_a).unwrap().unwrap();
    assert_eq!(calls.get(), 2);
}

#[test]
fn filter_results_iterate_twice_identically() {
    let mut bag = Bag::new();
    let filter = FunctionFilter::new("FF", "F", |row: &Row| {
        vec![Value::Float(row[0].as_f64().unwrap() + row[1].as_f64().unwrap())]
    })
    .unwrap();
    let fid = bag.add_filter(Box::new(filter)).unwrap();
    bag.expose_sink(bag.filter_input(fid), "data").unwrap();
    let sink = bag.register_sink("F").unwrap();
    bag.link(fid, sink).unwrap();

    let source = VecSource::new("FF", rows_ff(5), 8).unwrap();
    bag.start_flushing(sources_for("data", source)).unwrap();
    assert!(bag.start_new_round());

    let chunk = bag.get_chunk(sink).unwrap().unwrap();
    let first: Vec<Row> = chunk.iter().cloned().collect();
    let second: Vec<Row> = chunk.iter().cloned().collect();
    assert_eq!(first, second);
    assert_eq!(first.len(), 5);
    // Row 3: 3 + 6 = 9.
    assert_eq!(first[3], vec![Value::Float(9.0)]);
}

#[test]
fn function_filter_maps_rows() {
    let filter = FunctionFilter::new("FFF", "FFF", |row: &Row| {
        let m = row[0].as_f64().unwrap();
        let v = row[1].as_f64().unwrap();
        let dv = row[2].as_f64().unwrap();
        vec![
            Value::Float(m),
            Value::Float(v - dv),
            Value::Float(v + dv),
        ]
    })
    .unwrap();
    let out = filter.filter_chunk(&[vec![
        Value::Float(1.0),
        Value::Float(10.0),
        Value::Float(2.0),
    ]]);
    assert_eq!(
        out[0],
        vec![Value::Float(1.0), Value::Float(8.0), Value::Float(12.0)]
    );
}

#[test]
fn index_map_filter_reorders_and_duplicates() {
    let filter = IndexMapFilter::new("SF", vec![1, 1, 0]).unwrap();
    assert_eq!(filter.source_spec(), "FFS");
    let out = filter.filter_chunk(&[vec![Value::Str("a".into()), Value::Float(4.0)]]);
    assert_eq!(
        out[0],
        vec![Value::Float(4.0), Value::Float(4.0), Value::Str("a".into())]
    );

    // Out-of-range selection is caught at construction.
    assert!(IndexMapFilter::new("SF", vec![2]).is_err());
}

#[test]
fn spec_validation_rejects_unknown_kinds() {
    let mut bag = Bag::new();
    assert!(bag.register_sink("FQ").is_err());
    assert!(bag.register_sink("").is_err());
    assert!(VecSource::new("FZ", vec![], 4).is_err());
}
