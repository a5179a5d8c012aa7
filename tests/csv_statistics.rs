use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::write::GzEncoder;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

use datashaper::stats::{compute_statistics, statistics_from_gzip_path};
use datashaper::{ErrorKind, ToolError};

fn write_gz(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    let mut enc = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
    enc.write_all(contents.as_bytes()).unwrap();
    enc.finish().unwrap();
    path
}

#[tokio::test]
async fn computes_statistics_over_gzip_csv() {
    let dir = TempDir::new().unwrap();
    let path = write_gz(
        dir.path(),
        "sales.csv.gz",
        "region,units,price,note\n\
         north,10,2.5,\n\
         south,,3.5,promo\n\
         east,30,-1e1,\n\
         west,20,4.0,\"x, y\"\n",
    );

    let stats = compute_statistics(&path, CancellationToken::new()).await.unwrap();
    assert_eq!(stats.row_count, 4);
    assert_eq!(stats.columns.len(), 4);

    let region = stats.column("region").unwrap();
    assert!(!region.is_numeric());
    assert_eq!(region.count(), 0);

    let units = stats.column("units").unwrap();
    assert!(units.is_numeric());
    assert_eq!(units.count(), 3);
    assert!((units.mean() - 20.0).abs() < 1e-9);
    assert_eq!((units.min(), units.max()), (10.0, 30.0));

    let price = stats.column("price").unwrap();
    assert_eq!(price.count(), 4);
    assert!((price.mean() - 0.0).abs() < 1e-9);
    assert_eq!((price.min(), price.max()), (-10.0, 4.0));

    let note = stats.column("note").unwrap();
    assert!(!note.is_numeric());
    assert_eq!(note.mean(), 0.0);
    assert_eq!(note.min(), f64::INFINITY);
    assert_eq!(note.max(), f64::NEG_INFINITY);
}

#[test]
fn numeric_values_before_text_are_discarded() {
    let dir = TempDir::new().unwrap();
    let path = write_gz(dir.path(), "mixed.csv.gz", "v\n1\n2\n3\nn/a\n4\n");

    let stats = statistics_from_gzip_path(&path, &CancellationToken::new()).unwrap();
    assert_eq!(stats.row_count, 5);
    let v = &stats.columns[0];
    assert!(!v.is_numeric());
    assert_eq!(v.count(), 0);
    assert_eq!(v.mean(), 0.0);
}

#[test]
fn row_count_ignores_column_content() {
    let dir = TempDir::new().unwrap();
    let mut csv = String::from("a,b\n");
    for i in 0..1_000 {
        csv.push_str(&format!("{i},{}\n", if i % 3 == 0 { "" } else { "t" }));
    }
    let path = write_gz(dir.path(), "big.csv.gz", &csv);

    let stats = statistics_from_gzip_path(&path, &CancellationToken::new()).unwrap();
    assert_eq!(stats.row_count, 1_000);
    assert_eq!(stats.columns[0].count(), 1_000);
    assert!((stats.columns[0].mean() - 499.5).abs() < 1e-9);
}

#[test]
fn concatenated_gzip_members_are_all_read() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("appended.csv.gz");
    let mut file = File::create(&path).unwrap();
    for part in ["a\n1\n2\n", "3\n4\n"] {
        let mut enc = GzEncoder::new(Vec::new(), Compression::default());
        enc.write_all(part.as_bytes()).unwrap();
        file.write_all(&enc.finish().unwrap()).unwrap();
    }
    drop(file);

    let stats = statistics_from_gzip_path(&path, &CancellationToken::new()).unwrap();
    assert_eq!(stats.row_count, 4);
    assert_eq!(stats.columns[0].count(), 4);
    assert!((stats.columns[0].mean() - 2.5).abs() < 1e-9);
}

#[tokio::test]
async fn missing_file_is_not_found_naming_path() {
    let err = compute_statistics("tests/fixtures/does_not_exist.csv.gz", CancellationToken::new())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(err.to_string().contains("tests/fixtures/does_not_exist.csv.gz"));
}

#[tokio::test]
async fn cancellation_yields_cancelled_not_partial_success() {
    let dir = TempDir::new().unwrap();
    let path = write_gz(dir.path(), "rows.csv.gz", "a\n1\n2\n3\n");

    let token = CancellationToken::new();
    token.cancel();
    let err = compute_statistics(&path, token).await.unwrap_err();
    assert!(matches!(err, ToolError::Cancelled));
}
