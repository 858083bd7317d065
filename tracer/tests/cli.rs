use std::fs;
use std::path::Path;
use std::process::Command;

fn tracer() -> Command {
    Command::new(env!("CARGO_BIN_EXE_tracer"))
}

fn write(root: &Path, rel: &str, text: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, text).unwrap();
}

fn product_line(root: &Path) {
    write(root, "resources/stopwords_c.dat", "int\nvoid\n");
    write(root, "resources/extended_boolean_p_norm.dat", "2\n");
    write(root, "spl/P1/src/log.c", "void log_write();");
    write(root, "spl/P2/src/log.c", "void log_write(int level);");
    write(root, "spl/P2/src/crypto.c", "int encrypt();");
    write(
        root,
        "analysis.json",
        r#"{
            "language": "c",
            "products_base_path": "spl",
            "products": ["P1", "P2"],
            "features": {"logging": ["log"], "encryption": ["encrypt"]}
        }"#,
    );
}

#[test]
fn run_writes_report() {
    let dir = tempfile::tempdir().unwrap();
    product_line(dir.path());
    let report = dir.path().join("out/report.json");
    let status = tracer()
        .arg("run")
        .arg("--config")
        .arg(dir.path().join("analysis.json"))
        .arg("--output")
        .arg(&report)
        .status()
        .expect("failed to run");
    assert!(status.success());

    let json: serde_json::Value = serde_json::from_slice(&fs::read(&report).unwrap()).unwrap();
    assert_eq!(json["meta"]["num_products"], 2);
    assert_eq!(json["features"]["logging"]["variability"], "mandatory");
    assert_eq!(json["features"]["encryption"]["variability"], "optional");
    assert_eq!(json["features"]["encryption"]["specific_files"][0], "src/crypto.c");
}

#[test]
fn trace_then_classify() {
    let dir = tempfile::tempdir().unwrap();
    product_line(dir.path());
    let traces = dir.path().join("traces.json");
    let report = dir.path().join("report.json");

    let status = tracer()
        .args(["trace", "--config"])
        .arg(dir.path().join("analysis.json"))
        .arg("--output")
        .arg(&traces)
        .status()
        .unwrap();
    assert!(status.success());

    let status = tracer()
        .args(["classify", "--traces"])
        .arg(&traces)
        .arg("--base")
        .arg(dir.path().join("spl"))
        .arg("--output")
        .arg(&report)
        .status()
        .unwrap();
    assert!(status.success());

    let json: serde_json::Value = serde_json::from_slice(&fs::read(&report).unwrap()).unwrap();
    let ratios = json["features"]["logging"]["common_diff_ratios"].as_object().unwrap();
    assert_eq!(ratios.len(), 1);
}

#[test]
fn index_reports_file_counts() {
    let dir = tempfile::tempdir().unwrap();
    product_line(dir.path());
    let output = tracer()
        .args(["index", "--language", "c", "--project"])
        .arg(dir.path().join("spl/P2"))
        .arg("--resources")
        .arg(dir.path().join("resources"))
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["num_files"], 2);
    assert_eq!(json["language"], "c");
}

#[test]
fn unsupported_language_fails() {
    let dir = tempfile::tempdir().unwrap();
    product_line(dir.path());
    let output = tracer()
        .args(["index", "--language", "cobol", "--project"])
        .arg(dir.path().join("spl/P1"))
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unsupported language"));
}
