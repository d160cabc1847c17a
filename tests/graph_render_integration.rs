use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

struct TestGraph {
    root: PathBuf,
}

impl TestGraph {
    fn new(prefix: &str, document: &str) -> Self {
        let root = unique_temp_dir(prefix);
        fs::create_dir_all(&root).expect("create test dir");
        fs::write(root.join("graph.json"), document).expect("write graph.json");
        Self { root }
    }

    fn graph_path(&self) -> PathBuf {
        self.root.join("graph.json")
    }

    fn render(&self, view: Option<&str>) -> String {
        let mut cmd = Command::new(workgraph_bin());
        cmd.arg(self.graph_path());
        if let Some(view) = view {
            cmd.arg("--view").arg(view);
        }
        let output = cmd.output().expect("run workgraph");
        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        assert!(
            output.status.success(),
            "render command failed\nstdout:\n{stdout}\nstderr:\n{stderr}"
        );
        stdout
    }
}

impl Drop for TestGraph {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.root);
    }
}

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before epoch")
        .as_nanos();
    let pid = std::process::id();
    std::env::temp_dir().join(format!("workgraph-{prefix}-{pid}-{nanos}"))
}

fn workgraph_bin() -> PathBuf {
    if let Ok(path) = std::env::var("CARGO_BIN_EXE_workgraph") {
        return PathBuf::from(path);
    }

    let current_exe = std::env::current_exe().expect("resolve current test binary path");
    let target_dir = current_exe
        .parent()
        .and_then(Path::parent)
        .expect("derive cargo target dir from test binary path");
    let bin_name = if cfg!(windows) {
        "workgraph.exe"
    } else {
        "workgraph"
    };
    let fallback = target_dir.join(bin_name);

    if fallback.is_file() {
        fallback
    } else {
        panic!(
            "CARGO_BIN_EXE_workgraph is not set and fallback binary not found at {}",
            fallback.display()
        );
    }
}

const SAMPLE: &str = r#"{
    "nodes": {
        "p1": {"title": "Platform", "status": "in_progress", "type": "project"},
        "i1": {"title": "Login", "status": "completed", "type": "issue", "parent": "p1"},
        "i2": {"title": "Signup", "status": "blocked", "type": "issue", "parent": "p1"}
    },
    "edges": [
        {"from": "p1", "to": "i1", "type": "contains"},
        {"from": "p1", "to": "i2", "type": "contains"},
        {"from": "i1", "to": "i2", "type": "blocks"}
    ]
}"#;

#[test]
fn full_view_renders_groups_and_arrows() {
    let fixture = TestGraph::new("render-full", SAMPLE);
    let stdout = fixture.render(None);

    assert!(stdout.starts_with("graph TD\n"));
    assert!(stdout.contains("subgraph \"Platform\""));
    assert!(stdout.contains("i1[\"Login ✅\"]"));
    assert!(stdout.contains("i2[\"Signup 🔴\"]"));
    assert!(stdout.contains("i1 -->|blocks| i2"));
    assert!(!stdout.contains("|contains|"));
}

#[test]
fn critical_view_restricts_to_blocking_edges() {
    let fixture = TestGraph::new("render-critical", SAMPLE);
    let stdout = fixture.render(Some("critical"));

    assert!(stdout.contains("i1[\"Login ✅\"]"));
    assert!(stdout.contains("i2[\"Signup 🔴\"]"));
    assert!(!stdout.contains("p1["));
    assert!(stdout.contains("i1 -->|blocks| i2"));
}

#[test]
fn status_view_groups_by_status() {
    let fixture = TestGraph::new(
        "render-status",
        r#"{"nodes": {"1": {"title": "Init", "status": "pending"}}, "edges": []}"#,
    );
    let stdout = fixture.render(Some("status"));

    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        lines,
        vec![
            "graph TD",
            "    subgraph \"Pending\"",
            "        1[\"Init ⭕\"]",
            "    end",
        ]
    );
}

#[test]
fn unrecognized_view_falls_back_to_full() {
    let fixture = TestGraph::new("render-fallback", SAMPLE);
    let stdout = fixture.render(Some("sideways"));
    assert!(stdout.contains("subgraph \"Platform\""));
}

#[test]
fn empty_graph_renders_only_the_direction_line() {
    let fixture = TestGraph::new("render-empty", r#"{"nodes": {}, "edges": []}"#);
    assert_eq!(fixture.render(None).trim_end(), "graph TD");
}

#[test]
fn output_flag_writes_wrapped_markdown() {
    let fixture = TestGraph::new("render-output", SAMPLE);
    let out_path = fixture.root.join("graph.md");

    let output = Command::new(workgraph_bin())
        .arg(fixture.graph_path())
        .arg("--output")
        .arg(&out_path)
        .output()
        .expect("run workgraph --output");
    assert!(output.status.success());

    let written = fs::read_to_string(&out_path).expect("read output file");
    assert!(written.starts_with("## Dependency Graph\n\nGenerated: "));
    assert!(written.contains("```mermaid\ngraph TD\n"));
    assert!(written.trim_end().ends_with("```"));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Graph written to"));
}

#[test]
fn missing_input_file_fails_fast() {
    let missing = unique_temp_dir("render-missing").join("graph.json");
    let output = Command::new(workgraph_bin())
        .arg(&missing)
        .output()
        .expect("run workgraph on missing file");
    assert!(!output.status.success());
}

#[test]
fn malformed_input_fails_fast() {
    let fixture = TestGraph::new("render-malformed", "{not json");
    let output = Command::new(workgraph_bin())
        .arg(fixture.graph_path())
        .output()
        .expect("run workgraph on malformed file");
    assert!(!output.status.success());
}
