//! End-to-end tests for the convert command.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;

use patlab_cli::cli::{Cli, Command, ConvertArgs};
use patlab_cli::commands::run_convert;

const LAB_HEADER: &str = "PatientID,SampleID,Date,ProfileName,ProfileCode,\
R1,R2,R3,R4,R5,R6,R7,R8,R9,R10,R11,R12,R13,R14,R15,R16,R17,R18,R19,R20,R21,R22,R23,R24,R25,\
Code,Unit,Lower,Upper";

fn lab_line(patient: &str, sample: &str, date: &str, code: &str, cells: &[&str], bounds: (&str, &str)) -> String {
    let mut window = vec![String::new(); 25];
    for (idx, cell) in cells.iter().enumerate() {
        window[idx] = (*cell).to_string();
    }
    format!(
        "{patient},{sample},{date},Urea and Electrolytes,UE,{},{code},mmol/L,{},{}",
        window.join(","),
        bounds.0,
        bounds.1
    )
}

struct Fixture {
    _dir: tempfile::TempDir,
    lab: PathBuf,
    codes: PathBuf,
    patients: PathBuf,
    output: PathBuf,
}

fn fixture(lab_lines: &[String], patients_json: &str) -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let lab = dir.path().join("labresults.csv");
    let codes = dir.path().join("labresults-codes.csv");
    let patients = dir.path().join("patients.json");
    let output = dir.path().join("patient_data.json");

    let mut lab_text = String::from(LAB_HEADER);
    for line in lab_lines {
        lab_text.push('\n');
        lab_text.push_str(line);
    }
    lab_text.push('\n');
    fs::write(&lab, lab_text).unwrap();
    fs::write(
        &codes,
        "NA,39972003,Sodium\nK,88480006,Potassium\nUREA,273967009,\"Urea, serum\"\n",
    )
    .unwrap();
    fs::write(&patients, patients_json).unwrap();

    Fixture {
        _dir: dir,
        lab,
        codes,
        patients,
        output,
    }
}

fn args(fixture: &Fixture, dry_run: bool) -> ConvertArgs {
    ConvertArgs {
        lab_results: fixture.lab.clone(),
        code_table: fixture.codes.clone(),
        patients: fixture.patients.clone(),
        output: fixture.output.clone(),
        delimiter: ',',
        dry_run,
    }
}

const PATIENTS: &str = r#"[
    {"identifiers": ["1001", "MRN-1"], "id": "b7c3", "firstName": "Grace", "lastName": "Hopper", "dateOfBirth": "1906-12-09"},
    {"identifiers": [1002], "id": "c9d1", "firstName": "Alan", "lastName": "Turing", "dateOfBirth": "1912-06-23"}
]"#;

fn standard_lab_lines() -> Vec<String> {
    let cells = ["NA~140", "K~4.1", "UREA~6.2"];
    vec![
        lab_line("1001", "S-1", "05/03/2017", "NA", &cells, ("135", "145")),
        lab_line("1001", "S-1", "05/03/2017", "K", &cells, ("3.5", "5.2")),
        lab_line("1001", "S-1", "05/03/2017", "UREA", &cells, ("", "")),
        lab_line("1002", "S-2", "12/04/2017", "NA", &["NA~138"], ("135", "145")),
        lab_line("1001", "S-3", "01/06/2017", "K", &["K~3.9"], ("3.5", "5.2")),
    ]
}

fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn converts_inputs_to_patient_document() {
    let fixture = fixture(&standard_lab_lines(), PATIENTS);

    let result = run_convert(&args(&fixture, false)).unwrap();

    assert_eq!(result.output.as_deref(), Some(fixture.output.as_path()));
    assert_eq!(result.stats.patients, 2);
    assert_eq!(result.stats.results, 3);
    assert_eq!(result.stats.analytes, 5);
    assert_eq!(result.inputs.len(), 3);
    assert_eq!(result.inputs[0].records, 6);
    assert_eq!(result.inputs[0].sha256.len(), 64);

    let json = read_json(&fixture.output);
    let grace = &json["patients"][0];
    assert_eq!(grace["lastName"], "Hopper");
    assert_eq!(grace["firstName"], "Grace");
    assert_eq!(grace["dob"], "1906-12-09");
    assert_eq!(grace["id"], "b7c3");
    assert_eq!(grace["lab_results"].as_array().unwrap().len(), 2);

    let first = &grace["lab_results"][0];
    assert_eq!(first["timestamp"], "2017-03-05");
    assert_eq!(first["profile"]["name"], "Urea and Electrolytes");
    assert_eq!(first["profile"]["code"], "UE");
    let panel = first["panel"].as_array().unwrap();
    assert_eq!(panel.len(), 3);
    assert_eq!(panel[0]["code"], "39972003");
    assert_eq!(panel[0]["label"], "Sodium");
    assert_eq!(panel[0]["value"], "140");
    assert_eq!(panel[0]["lower"], 135.0);
    assert_eq!(panel[0]["upper"], 145.0);
    assert_eq!(panel[2]["label"], "Urea, serum");
    assert!(panel[2]["lower"].is_null());
    assert!(panel[2]["upper"].is_null());

    // The last sample in the file belongs to the first patient.
    assert_eq!(grace["lab_results"][1]["timestamp"], "2017-06-01");

    let alan = &json["patients"][1];
    assert_eq!(alan["lab_results"].as_array().unwrap().len(), 1);
    assert_eq!(alan["lab_results"][0]["panel"][0]["value"], "138");
}

#[test]
fn dry_run_writes_nothing() {
    let fixture = fixture(&standard_lab_lines(), PATIENTS);

    let result = run_convert(&args(&fixture, true)).unwrap();

    assert!(result.output.is_none());
    assert_eq!(result.stats.results, 3);
    assert!(!fixture.output.exists());
}

#[test]
fn orphan_result_writes_nothing() {
    let mut lines = standard_lab_lines();
    lines.push(lab_line("4242", "S-9", "02/06/2017", "NA", &["NA~141"], ("", "")));
    let fixture = fixture(&lines, PATIENTS);

    let err = run_convert(&args(&fixture, false)).unwrap_err();

    assert!(format!("{err:#}").contains("unknown patient 4242"));
    assert!(!fixture.output.exists());
}

#[test]
fn unknown_code_names_the_line() {
    let lines = vec![lab_line("1001", "S-1", "05/03/2017", "HB", &["HB~13.5"], ("", ""))];
    let fixture = fixture(&lines, PATIENTS);

    let err = run_convert(&args(&fixture, false)).unwrap_err();

    let message = format!("{err:#}");
    assert!(message.contains("line 2"));
    assert!(message.contains("\"HB\""));
    assert!(!fixture.output.exists());
}

#[test]
fn empty_identifiers_fail_the_run() {
    let patients = r#"[{"identifiers": [], "id": "x", "firstName": "A", "lastName": "B", "dateOfBirth": "2000-01-01"}]"#;
    let fixture = fixture(&standard_lab_lines(), patients);

    let err = run_convert(&args(&fixture, false)).unwrap_err();

    assert!(format!("{err:#}").contains("patient record 0"));
    assert!(!fixture.output.exists());
}

#[test]
fn missing_input_is_reported() {
    let fixture = fixture(&standard_lab_lines(), PATIENTS);
    let mut args = args(&fixture, false);
    args.code_table = fixture.lab.with_file_name("absent.csv");

    let err = run_convert(&args).unwrap_err();

    assert!(format!("{err:#}").contains("read code table"));
}

#[test]
fn parses_convert_command_line() {
    let cli = Cli::try_parse_from([
        "patlab",
        "convert",
        "labs.csv",
        "codes.csv",
        "patients.json",
        "--output",
        "out.json",
        "--delimiter",
        ";",
        "--dry-run",
    ])
    .unwrap();

    match cli.command {
        Command::Convert(args) => {
            assert_eq!(args.lab_results, PathBuf::from("labs.csv"));
            assert_eq!(args.code_table, PathBuf::from("codes.csv"));
            assert_eq!(args.patients, PathBuf::from("patients.json"));
            assert_eq!(args.output, PathBuf::from("out.json"));
            assert_eq!(args.delimiter, ';');
            assert!(args.dry_run);
        }
        Command::Codes(_) => panic!("expected convert"),
    }
}

#[test]
fn convert_requires_three_paths() {
    assert!(Cli::try_parse_from(["patlab", "convert", "labs.csv", "codes.csv"]).is_err());
}
