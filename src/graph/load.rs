use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::info;

use super::adjacency::{Graph, VertexId};
use crate::error::{LinkError, Result};

/// Options controlling how an edge list is turned into a [`Graph`].
#[derive(Clone, Copy, Debug, Default)]
pub struct LoadOptions {
    /// Sort and deduplicate the edges before building instead of requiring
    /// the file to be ordered by `(v, u)`.
    pub sort_input: bool,
}

/// Parses `u v weight` lines. The weight column is optional and ignored.
///
/// Blank lines and lines starting with `#` or `%` are skipped.
pub fn parse_edge_list<R: BufRead>(reader: R) -> Result<Vec<(VertexId, VertexId)>> {
    let mut edges = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = idx + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('%') {
            continue;
        }
        let mut fields = trimmed.split_whitespace();
        let u = parse_vertex(fields.next(), line_no)?;
        let v = parse_vertex(fields.next(), line_no)?;
        edges.push((u, v));
    }
    Ok(edges)
}

fn parse_vertex(field: Option<&str>, line: usize) -> Result<VertexId> {
    let raw = field.ok_or_else(|| LinkError::Parse {
        line,
        message: "expected `u v weight`".into(),
    })?;
    raw.parse::<VertexId>().map_err(|err| LinkError::Parse {
        line,
        message: format!("invalid vertex id '{raw}': {err}"),
    })
}

/// Reads the edge list at `path`.
pub fn read_edge_list(path: impl AsRef<Path>) -> Result<Vec<(VertexId, VertexId)>> {
    let file = File::open(path.as_ref())?;
    parse_edge_list(BufReader::new(file))
}

/// Reads the edge list at `path` and builds the graph.
pub fn load_graph(path: impl AsRef<Path>, opts: LoadOptions) -> Result<Graph> {
    let path = path.as_ref();
    let edges = read_edge_list(path)?;
    let graph = if opts.sort_input {
        Graph::from_edges(&edges)?
    } else {
        Graph::from_sorted_edges(&edges)?
    };
    info!(
        path = %path.display(),
        lines = edges.len(),
        vertices = graph.vertex_count(),
        edges = graph.edge_count(),
        "graph.load.complete"
    );
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    #[test]
    fn parses_triples_and_skips_comments() {
        let input = "% header\n1 2 7\n\n# note\n2 3 1\n3 4\n";
        let edges = parse_edge_list(Cursor::new(input)).unwrap();
        assert_eq!(edges, vec![(1, 2), (2, 3), (3, 4)]);
    }

    #[test]
    fn reports_malformed_line() {
        let err = parse_edge_list(Cursor::new("1 2 1\n3 x 1\n")).unwrap_err();
        match err {
            LinkError::Parse { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error {other:?}"),
        }
        let err = parse_edge_list(Cursor::new("5\n")).unwrap_err();
        assert!(matches!(err, LinkError::Parse { line: 1, .. }));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_graph(dir.path().join("absent.txt"), LoadOptions::default()).unwrap_err();
        assert!(matches!(err, LinkError::Io(_)));
    }

    #[test]
    fn sort_input_accepts_unordered_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "3 4 1\n1 2 1\n2 3 1").unwrap();

        let strict = load_graph(file.path(), LoadOptions::default());
        assert!(matches!(strict, Err(LinkError::UnsortedEdges { .. })));

        let graph = load_graph(file.path(), LoadOptions { sort_input: true }).unwrap();
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.neighbors(3), &[2, 4]);
    }
}
