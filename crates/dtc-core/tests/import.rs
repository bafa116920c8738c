use dtc_core::{
    run_import, Error, ImportPlan, Language, SourceFormat, WriteMode, DEFAULT_LICENSE, HEADERS,
};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn read_output(path: &Path) -> Vec<csv::StringRecord> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)
        .unwrap();
    reader.records().map(|r| r.unwrap()).collect()
}

#[test]
fn csv_row_normalized_into_english_columns() {
    let dir = tempdir().unwrap();
    let input = write_file(&dir, "bosch.csv", "code,description\np123,Oxygen sensor fault\n");
    let out = dir.path().join("seed.csv");

    let plan = ImportPlan::new(vec![input], &out, "bosch");
    let outcome = run_import(&plan).unwrap();

    assert_eq!(outcome.imported(), 1);
    let records = read_output(&out);
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].iter().collect::<Vec<_>>(), HEADERS.to_vec());

    let row: Vec<&str> = records[1].iter().collect();
    assert_eq!(
        row,
        vec![
            "P0123",
            "Powertrain",
            "bosch",
            "Oxygen sensor fault",
            "Oxygen sensor fault",
            "",
            "",
            "",
            "",
            "",
            "",
            DEFAULT_LICENSE,
        ]
    );
}

#[test]
fn duplicate_code_across_files_keeps_first() {
    let dir = tempdir().unwrap();
    let first = write_file(&dir, "first.csv", "code,description\nU0100,From first file\n");
    let second = write_file(
        &dir,
        "second.json",
        r#"[{"code": "U0100", "description": "From second file"}, {"code": "P0300", "description": "Misfire"}]"#,
    );
    let out = dir.path().join("seed.csv");

    let plan = ImportPlan::new(vec![first, second], &out, "toyota");
    let outcome = run_import(&plan).unwrap();

    assert_eq!(outcome.imported(), 2);
    assert_eq!(outcome.report.sources[1].duplicates, 1);

    let records = read_output(&out);
    let u0100: Vec<&csv::StringRecord> = records.iter().filter(|r| &r[0] == "U0100").collect();
    assert_eq!(u0100.len(), 1);
    assert_eq!(&u0100[0][4], "From first file");
    assert_eq!(&u0100[0][1], "Network");
    assert_eq!(&records[2][0], "P0300");
}

#[test]
fn json_rows_object_infers_body() {
    let dir = tempdir().unwrap();
    let input = write_file(
        &dir,
        "vendor.json",
        r#"{"rows": [{"code": "B1234", "description": "Door latch"}]}"#,
    );
    let out = dir.path().join("seed.csv");

    run_import(&ImportPlan::new(vec![input], &out, "bosch")).unwrap();

    let records = read_output(&out);
    assert_eq!(&records[1][0], "B1234");
    assert_eq!(&records[1][1], "Body");
}

#[test]
fn turkish_run_with_custom_fields_and_system_override() {
    let dir = tempdir().unwrap();
    let input = write_file(
        &dir,
        "launch.csv",
        "dtc,aciklama,nedenler,cozumler\np0171,Karisim fakir,vakum kacagi;MAF,hortumu degistir\n",
    );
    let out = dir.path().join("seed.csv");

    let mut plan = ImportPlan::new(vec![input], &out, "launch");
    plan.lang = Language::Tr;
    plan.fields.code = "dtc".to_string();
    plan.fields.description = "aciklama".to_string();
    plan.fields.causes = "nedenler".to_string();
    plan.fields.fixes = "cozumler".to_string();
    plan.system = Some("Chassis".to_string());
    plan.license = "Launch dataset, internal use".to_string();

    run_import(&plan).unwrap();

    let records = read_output(&out);
    let row = &records[1];
    assert_eq!(&row[0], "P0171");
    assert_eq!(&row[1], "Chassis");
    assert_eq!(&row[3], "");
    assert_eq!(&row[7], "Karisim fakir");
    assert_eq!(&row[8], "Karisim fakir");
    assert_eq!(&row[9], "vakum kacagi;MAF");
    assert_eq!(&row[10], "hortumu degistir");
    assert_eq!(&row[11], "Launch dataset, internal use");
}

#[test]
fn append_mode_extends_existing_seed() {
    let dir = tempdir().unwrap();
    let first = write_file(&dir, "a.csv", "code,description\nP0100,MAF\n");
    let second = write_file(&dir, "b.csv", "code,description\nP0100,MAF again\nP0101,MAF range\n");
    let out = dir.path().join("seed.csv");

    let mut plan = ImportPlan::new(vec![first], &out, "bosch");
    plan.append = true;
    let outcome = run_import(&plan).unwrap();
    assert_eq!(outcome.written.unwrap().mode, WriteMode::Create);

    // Dedup state is per run, so P0100 is written again
    let mut plan = ImportPlan::new(vec![second], &out, "bosch");
    plan.append = true;
    let outcome = run_import(&plan).unwrap();
    assert_eq!(outcome.written.unwrap().mode, WriteMode::Append);

    let records = read_output(&out);
    assert_eq!(records.len(), 4);
    assert_eq!(records.iter().filter(|r| &r[0] == "code").count(), 1);
    assert_eq!(&records[2][0], "P0100");
}

#[test]
fn overwrite_mode_replaces_existing_seed() {
    let dir = tempdir().unwrap();
    let input = write_file(&dir, "a.csv", "code\nC0035\n");
    let out = write_file(&dir, "seed.csv", "stale\nrow\nrow\nrow\n");

    run_import(&ImportPlan::new(vec![input], &out, "bosch")).unwrap();

    let records = read_output(&out);
    assert_eq!(records.len(), 2);
    assert_eq!(&records[1][0], "C0035");
}

#[test]
fn zero_rows_leaves_output_untouched() {
    let dir = tempdir().unwrap();
    let input = write_file(&dir, "empty_codes.csv", "code,description\n,Missing\n  ,Blank\n");
    let other = write_file(&dir, "no_code_field.json", r#"[{"description": "No code"}]"#);
    let out = dir.path().join("seed.csv");

    let outcome = run_import(&ImportPlan::new(vec![input, other], &out, "bosch")).unwrap();

    assert!(outcome.report.is_empty());
    assert!(outcome.written.is_none());
    assert_eq!(outcome.imported(), 0);
    assert_eq!(outcome.report.skipped_count(), 3);
    assert!(!out.exists());
}

#[test]
fn unsupported_extension_is_skipped() {
    let dir = tempdir().unwrap();
    let notes = write_file(&dir, "notes.txt", "code\nP0100\n");
    let input = write_file(&dir, "a.csv", "code\nP0100\n");
    let out = dir.path().join("seed.csv");

    let outcome = run_import(&ImportPlan::new(vec![notes.clone(), input], &out, "bosch")).unwrap();

    assert_eq!(outcome.imported(), 1);
    assert_eq!(outcome.report.sources[0].format, None);
    assert_eq!(outcome.report.sources[1].format, Some(SourceFormat::Csv));
    assert_eq!(outcome.report.unsupported().collect::<Vec<_>>(), vec![notes.as_path()]);
}

#[test]
fn missing_input_aborts_before_writing() {
    let dir = tempdir().unwrap();
    let good = write_file(&dir, "a.csv", "code\nP0100\n");
    let missing = dir.path().join("missing.csv");
    let out = dir.path().join("seed.csv");

    let result = run_import(&ImportPlan::new(vec![good, missing], &out, "bosch"));

    assert!(matches!(result, Err(Error::FileRead { .. })));
    assert!(!out.exists());
}

#[test]
fn malformed_json_is_fatal() {
    let dir = tempdir().unwrap();
    let broken = write_file(&dir, "broken.json", "{\"rows\": [");
    let out = dir.path().join("seed.csv");

    let result = run_import(&ImportPlan::new(vec![broken], &out, "bosch"));
    assert!(matches!(result, Err(Error::JsonParse { .. })));
}

#[test]
fn non_utf8_input_is_fatal() {
    let dir = tempdir().unwrap();
    let good = write_file(&dir, "a.csv", "code\nP0100\n");
    let bad = dir.path().join("bad.csv");
    fs::write(&bad, b"code\n\xff\xfe\n").unwrap();
    let out = dir.path().join("seed.csv");

    let result = run_import(&ImportPlan::new(vec![good, bad], &out, "bosch"));

    assert!(matches!(result, Err(Error::Encoding { .. })));
    assert!(!out.exists());
}

#[test]
fn directory_input_expands_to_sorted_files() {
    let dir = tempdir().unwrap();
    let vendor = dir.path().join("vendor");
    fs::create_dir(&vendor).unwrap();
    fs::write(vendor.join("02_second.csv"), "code,description\nP0100,second\n").unwrap();
    fs::write(vendor.join("01_first.json"), r#"[{"code": "P0100", "description": "first"}]"#).unwrap();
    fs::write(vendor.join("README.md"), "ignored").unwrap();
    let out = dir.path().join("seed.csv");

    let outcome = run_import(&ImportPlan::new(vec![vendor], &out, "bosch")).unwrap();

    assert_eq!(outcome.report.sources.len(), 2);
    let records = read_output(&out);
    assert_eq!(records.len(), 2);
    assert_eq!(&records[1][4], "first");
}

#[test]
fn plan_file_round_trip_runs() {
    let dir = tempdir().unwrap();
    let input = write_file(&dir, "a.csv", "code\nU0001\n");
    let out = dir.path().join("seed.csv");
    let plan_path = dir.path().join("plan.json");

    ImportPlan::new(vec![input], &out, "autel").save(&plan_path).unwrap();
    let plan = ImportPlan::load(&plan_path).unwrap();
    let outcome = run_import(&plan).unwrap();

    assert_eq!(outcome.imported(), 1);
    assert_eq!(&read_output(&out)[1][2], "autel");
}
