//! The "bag": a small pull-based dataflow graph. Exposed sinks are fed
//! chunk-wise from named external sources; linked sinks are fed through
//! filters. All wiring is spec-checked up front, and filter output is
//! cached per round so fan-out never re-runs a filter.

use std::collections::HashMap;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::errors::{PlotError, Result};

/// One cell of a data row.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
}

impl Value {
    pub fn kind_char(&self) -> char {
        match self {
            Self::Int(_) => 'I',
            Self::Float(_) => 'F',
            Self::Str(_) => 'S',
            Self::Bool(_) => 'B',
        }
    }

    pub fn as_f64(&self) -> Result<f64> {
        match self {
            Self::Float(v) => Ok(*v),
            Self::Int(v) => Ok(*v as f64),
            other => Err(PlotError::domain(format!(
                "expected float value, got {other:?}"
            ))),
        }
    }

    pub fn as_i64(&self) -> Result<i64> {
        match self {
            Self::Int(v) => Ok(*v),
            other => Err(PlotError::domain(format!(
                "expected integer value, got {other:?}"
            ))),
        }
    }
}

pub type Row = Vec<Value>;
pub type Chunk = Vec<Row>;

/// A column type specification: one character per column, `I` integer,
/// `F` float, `S` string, `B` bool.
pub fn validate_spec(spec: &str) -> Result<()> {
    if spec.is_empty() {
        return Err(PlotError::wiring("empty column spec"));
    }
    for c in spec.chars() {
        if !matches!(c, 'I' | 'F' | 'S' | 'B') {
            return Err(PlotError::wiring(format!(
                "unknown column kind {c:?} in spec {spec:?}"
            )));
        }
    }
    Ok(())
}

pub fn row_matches_spec(row: &Row, spec: &str) -> bool {
    row.len() == spec.len()
        && row
            .iter()
            .zip(spec.chars())
            .all(|(v, c)| v.kind_char() == c)
}

/// External chunk producer attached to an exposed name at flush time.
/// Rows within a chunk are owned, so a chunk can be iterated repeatedly.
pub trait DataSource {
    fn source_spec(&self) -> &str;
    fn next_chunk(&mut self) -> Option<Chunk>;
}

/// In-memory source: rows split into fixed-size chunks.
pub struct VecSource {
    spec: String,
    chunks: VecDeque<Chunk>,
}

impl VecSource {
    pub fn new(spec: &str, rows: Vec<Row>, chunk_size: usize) -> Result<Self> {
        validate_spec(spec)?;
        for row in &rows {
            if !row_matches_spec(row, spec) {
                return Err(PlotError::wiring(format!(
                    "row does not match source spec {spec:?}"
                )));
            }
        }
        let size = chunk_size.max(1);
        let mut chunks = VecDeque::new();
        let mut rows = rows;
        while !rows.is_empty() {
            let rest = rows.split_off(rows.len().min(size));
            chunks.push_back(rows);
            rows = rest;
        }
        Ok(Self {
            spec: spec.to_string(),
            chunks,
        })
    }

    /// Convenience for the common two-float-column case.
    pub fn from_xy(xs: &[f64], ys: &[f64], chunk_size: usize) -> Result<Self> {
        let rows = xs
            .iter()
            .zip(ys.iter())
            .map(|(&x, &y)| vec![Value::Float(x), Value::Float(y)])
            .collect();
        Self::new("FF", rows, chunk_size)
    }
}

impl DataSource for VecSource {
    fn source_spec(&self) -> &str {
        &self.spec
    }

    fn next_chunk(&mut self) -> Option<Chunk> {
        self.chunks.pop_front()
    }
}

/// A dataflow transform. `filter_chunk` must return a materialized list:
/// downstream consumers may iterate the result more than once.
pub trait Filter {
    fn sink_spec(&self) -> &str;
    fn source_spec(&self) -> &str;
    fn filter_chunk(&self, chunk: &[Row]) -> Chunk;
}

/// Applies a function to every row.
pub struct FunctionFilter {
    sink_spec: String,
    source_spec: String,
    func: Box<dyn Fn(&Row) -> Row>,
}

impl FunctionFilter {
    pub fn new(
        sink_spec: &str,
        source_spec: &str,
        func: impl Fn(&Row) -> Row + 'static,
    ) -> Result<Self> {
        validate_spec(sink_spec)?;
        validate_spec(source_spec)?;
        Ok(Self {
            sink_spec: sink_spec.to_string(),
            source_spec: source_spec.to_string(),
            func: Box::new(func),
        })
    }
}

impl Filter for FunctionFilter {
    fn sink_spec(&self) -> &str {
        &self.sink_spec
    }

    fn source_spec(&self) -> &str {
        &self.source_spec
    }

    fn filter_chunk(&self, chunk: &[Row]) -> Chunk {
        chunk.iter().map(|row| (self.func)(row)).collect()
    }
}

/// Reorders or duplicates columns by index; the source spec is derived
/// by selecting characters of the sink spec.
pub struct IndexMapFilter {
    sink_spec: String,
    source_spec: String,
    out_indices: Vec<usize>,
}

impl IndexMapFilter {
    pub fn new(sink_spec: &str, out_indices: Vec<usize>) -> Result<Self> {
        validate_spec(sink_spec)?;
        let chars: Vec<char> = sink_spec.chars().collect();
        let mut source_spec = String::with_capacity(out_indices.len());
        for &i in &out_indices {
            let c = chars.get(i).ok_or_else(|| {
                PlotError::wiring(format!(
                    "index {i} out of range for sink spec {sink_spec:?}"
                ))
            })?;
            source_spec.push(*c);
        }
        Ok(Self {
            sink_spec: sink_spec.to_string(),
            source_spec,
            out_indices,
        })
    }
}

impl Filter for IndexMapFilter {
    fn sink_spec(&self) -> &str {
        &self.sink_spec
    }

    fn source_spec(&self) -> &str {
        &self.source_spec
    }

    fn filter_chunk(&self, chunk: &[Row]) -> Chunk {
        chunk
            .iter()
            .map(|row| self.out_indices.iter().map(|&i| row[i].clone()).collect())
            .collect()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SinkId(usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FilterId(usize);

struct SinkEntry {
    spec: String,
    exposed_as: Option<String>,
    fed_by: Option<FilterId>,
}

struct FilterEntry {
    filter: Box<dyn Filter>,
    input: SinkId,
}

pub struct Bag {
    sinks: Vec<SinkEntry>,
    filters: Vec<FilterEntry>,
    exposed: HashMap<String, Vec<SinkId>>,
    exposed_specs: HashMap<String, String>,
    streams: HashMap<String, Box<dyn DataSource>>,
    flushing: bool,
    current_round: HashMap<SinkId, Rc<Chunk>>,
    filter_cache: HashMap<FilterId, Option<Rc<Chunk>>>,
}

impl Bag {
    pub fn new() -> Self {
        Self {
            sinks: Vec::new(),
            filters: Vec::new(),
            exposed: HashMap::new(),
            exposed_specs: HashMap::new(),
            streams: HashMap::new(),
            flushing: false,
            current_round: HashMap::new(),
            filter_cache: HashMap::new(),
        }
    }

    /// Record a consumer with its sink spec.
    pub fn register_sink(&mut self, spec: &str) -> Result<SinkId> {
        validate_spec(spec)?;
        self.sinks.push(SinkEntry {
            spec: spec.to_string(),
            exposed_as: None,
            fed_by: None,
        });
        Ok(SinkId(self.sinks.len() - 1))
    }

    pub fn sink_spec(&self, sink: SinkId) -> &str {
        &self.sinks[sink.0].spec
    }

    /// Attach a sink under an external name. Two sinks may share a name
    /// only if their specs agree, and an exposed sink may not also be
    /// linked.
    pub fn expose_sink(&mut self, sink: SinkId, name: &str) -> Result<()> {
        let entry = &self.sinks[sink.0];
        if entry.fed_by.is_some() {
            return Err(PlotError::wiring(format!(
                "sink {:?} is already linked; cannot expose as {name:?}",
                sink
            )));
        }
        if let Some(spec) = self.exposed_specs.get(name) {
            if spec != &entry.spec {
                return Err(PlotError::wiring(format!(
                    "name {name:?} already exposed with spec {spec:?}, sink wants {:?}",
                    entry.spec
                )));
            }
        } else {
            self.exposed_specs
                .insert(name.to_string(), entry.spec.clone());
        }
        self.sinks[sink.0].exposed_as = Some(name.to_string());
        self.exposed.entry(name.to_string()).or_default().push(sink);
        tracing::debug!(name, ?sink, "exposed sink");
        Ok(())
    }

    /// Register a filter. Its input side becomes an ordinary sink that
    /// must itself be exposed or linked.
    pub fn add_filter(&mut self, filter: Box<dyn Filter>) -> Result<FilterId> {
        validate_spec(filter.sink_spec())?;
        validate_spec(filter.source_spec())?;
        let input = self.register_sink(filter.sink_spec())?;
        self.filters.push(FilterEntry { filter, input });
        Ok(FilterId(self.filters.len() - 1))
    }

    pub fn filter_input(&self, filter: FilterId) -> SinkId {
        self.filters[filter.0].input
    }

    /// Feed `sink` from a filter's output. Specs must agree exactly.
    pub fn link(&mut self, source: FilterId, sink: SinkId) -> Result<()> {
        let source_spec = self.filters[source.0].filter.source_spec().to_string();
        let entry = &self.sinks[sink.0];
        if entry.exposed_as.is_some() {
            return Err(PlotError::wiring(format!(
                "sink {sink:?} is already exposed; cannot also link"
            )));
        }
        if source_spec != entry.spec {
            return Err(PlotError::wiring(format!(
                "link spec mismatch: source yields {source_spec:?}, sink wants {:?}",
                entry.spec
            )));
        }
        self.sinks[sink.0].fed_by = Some(source);
        tracing::debug!(?source, ?sink, "linked sink");
        Ok(())
    }

    /// Bind external sources to the exposed names and validate the whole
    /// graph: every registered sink must be either exposed or linked.
    pub fn start_flushing(
        &mut self,
        mut sources: HashMap<String, Box<dyn DataSource>>,
    ) -> Result<()> {
        for (i, entry) in self.sinks.iter().enumerate() {
            if entry.exposed_as.is_none() && entry.fed_by.is_none() {
                return Err(PlotError::wiring(format!(
                    "sink #{i} (spec {:?}) is neither exposed nor linked",
                    entry.spec
                )));
            }
        }
        self.streams.clear();
        for (name, spec) in &self.exposed_specs {
            let source = sources.remove(name).ok_or_else(|| {
                PlotError::wiring(format!("no source supplied for exposed name {name:?}"))
            })?;
            if source.source_spec() != spec {
                return Err(PlotError::wiring(format!(
                    "source for {name:?} yields {:?}, exposure wants {spec:?}",
                    source.source_spec()
                )));
            }
            self.streams.insert(name.clone(), source);
        }
        self.flushing = true;
        self.current_round.clear();
        self.filter_cache.clear();
        tracing::debug!(names = self.streams.len(), "bag flushing started");
        Ok(())
    }

    /// Advance every exposed stream by one chunk. Returns false once no
    /// stream produced anything; each round's caches die with the round.
    pub fn start_new_round(&mut self) -> bool {
        if !self.flushing {
            return false;
        }
        self.current_round.clear();
        self.filter_cache.clear();
        let mut any = false;
        for (name, stream) in self.streams.iter_mut() {
            if let Some(chunk) = stream.next_chunk() {
                any = true;
                let chunk = Rc::new(chunk);
                if let Some(sinks) = self.exposed.get(name) {
                    for &sink in sinks {
                        self.current_round.insert(sink, Rc::clone(&chunk));
                    }
                }
            }
        }
        tracing::debug!(any, "bag round");
        any
    }

    /// The chunk feeding `sink` this round, pulling it through the
    /// filter chain on first demand. The result is a shared materialized
    /// list, so it can be iterated any number of times, and a filter
    /// runs at most once per round no matter how many sinks it feeds.
    pub fn get_chunk(&mut self, sink: SinkId) -> Result<Option<Rc<Chunk>>> {
        if let Some(chunk) = self.current_round.get(&sink) {
            return Ok(Some(Rc::clone(chunk)));
        }
        let Some(fid) = self.sinks[sink.0].fed_by else {
            if self.sinks[sink.0].exposed_as.is_some() {
                // Exposed, but its stream yielded nothing this round.
                return Ok(None);
            }
            return Err(PlotError::wiring(format!(
                "sink {sink:?} is neither exposed nor linked"
            )));
        };
        if let Some(cached) = self.filter_cache.get(&fid) {
            return Ok(cached.clone());
        }
        let upstream = self.get_chunk(self.filters[fid.0].input)?;
        let out = upstream.map(|chunk| Rc::new(self.filters[fid.0].filter.filter_chunk(&chunk)));
        self.filter_cache.insert(fid, out.clone());
        Ok(out)
    }
}

impl Default for Bag {
    fn default() -> Self {
        Self::new()
    }
}
