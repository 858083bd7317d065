use splcore::classifier::{classify, ProductTraces, Variability};
use std::collections::{BTreeMap, BTreeSet};

fn set(files: &[&str]) -> BTreeSet<String> {
    files.iter().map(|f| f.to_string()).collect()
}

fn traces(rows: &[(&str, &str, &[&str])]) -> ProductTraces {
    let mut t = ProductTraces::new();
    for (product, feature, files) in rows {
        t.entry(product.to_string())
            .or_insert_with(BTreeMap::new)
            .insert(feature.to_string(), set(files));
    }
    t
}

#[test]
fn feature_in_every_product_is_mandatory() {
    let t = traces(&[
        ("P1", "logging", &["src/log.c"]),
        ("P2", "logging", &["src/log.c"]),
        ("P3", "logging", &["src/log.c"]),
    ]);
    let results = classify(&t);
    let logging = &results["logging"];
    assert_eq!(logging.variability, Variability::Mandatory);
    assert_eq!(logging.products, vec!["P1", "P2", "P3"]);
    assert_eq!(logging.common_files, set(&["src/log.c"]));
}

#[test]
fn optional_feature_splits_common_and_specific() {
    let t = traces(&[
        ("P1", "encryption", &["src/crypto.c", "src/crypto_extra.c"]),
        ("P1", "logging", &["src/log.c"]),
        ("P2", "logging", &["src/log.c"]),
        ("P3", "encryption", &["src/crypto.c/"]),
        ("P3", "logging", &["src/log.c"]),
    ]);
    let enc = &classify(&t)["encryption"];
    assert_eq!(enc.variability, Variability::Optional);
    assert_eq!(enc.products, vec!["P1", "P3"]);
    assert_eq!(enc.common_files, set(&["src/crypto.c"]));
    assert_eq!(enc.specific_files, set(&["src/crypto_extra.c"]));
    assert!(enc.shared_files.is_empty());
}

#[test]
fn file_missing_from_one_tracing_product_becomes_shared() {
    let t = traces(&[
        ("P1", "encryption", &["src/crypto.c", "src/key.c"]),
        ("P2", "encryption", &["src/crypto.c", "src/key.c"]),
        ("P3", "encryption", &["src/crypto.c"]),
        ("P4", "encryption", &["src/key.c", "src/p4_only.c"]),
        ("P5", "other", &["x.c"]),
    ]);
    let enc = &classify(&t)["encryption"];
    assert_eq!(enc.variability, Variability::Optional);
    assert!(enc.common_files.is_empty());
    assert_eq!(enc.shared_files, set(&["src/crypto.c", "src/key.c"]));
    assert_eq!(enc.specific_files, set(&["src/p4_only.c"]));
}

#[test]
fn partitions_cover_all_files_and_are_disjoint() {
    let t = traces(&[
        ("A", "f", &["1", "2", "3", "4"]),
        ("B", "f", &["1", "2", "5"]),
        ("C", "f", &["1", "3", "6"]),
        ("D", "g", &["7"]),
    ]);
    for result in classify(&t).values() {
        let union: BTreeSet<String> = result
            .common_files
            .iter()
            .chain(&result.shared_files)
            .chain(&result.specific_files)
            .cloned()
            .collect();
        assert_eq!(union, result.all_files);
        assert!(result.common_files.is_disjoint(&result.shared_files));
        assert!(result.common_files.is_disjoint(&result.specific_files));
        assert!(result.shared_files.is_disjoint(&result.specific_files));
    }
    let f = &classify(&t)["f"];
    assert_eq!(f.common_files, set(&["1"]));
    assert_eq!(f.shared_files, set(&["2", "3"]));
    assert_eq!(f.specific_files, set(&["4", "5", "6"]));
}

#[test]
fn classification_is_idempotent() {
    let t = traces(&[("A", "f", &["x", "y"]), ("B", "f", &["y"]), ("B", "g", &["z"])]);
    assert_eq!(classify(&t), classify(&t));
}

#[test]
fn empty_trace_table_yields_no_features() {
    assert!(classify(&ProductTraces::new()).is_empty());
}
