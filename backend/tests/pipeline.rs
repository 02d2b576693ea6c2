//! End-to-end tests: sheet bytes to summary.

use frequencia::{
    summarize, summarize_file, AppConfig, DenominatorPolicy, PipelineError, ReportRequest,
    SourceFile, SourceFormat, Status,
};
use pretty_assertions::assert_eq;
use std::io::Write;

const SHEET: &str = "\
NOME;MATRICULA;FUNÇÃO;SETOR;UNIDADE;01/03;02/03;03/03;04/03;05/03
Ana Silva;101;OPERADOR;A;CD1;PRESENTE;PRESENTE;FALTA;DSR;PRESENTE
Bruno Costa;102;OPERADOR;A;CD1;PRESENTE;PRESENTE;PRESENTE;DSR;PRESENTE
MARIANA;103;LIDER;B;CD2;ATESTADO MÉDICO;PRESENTE;;DSR;BANCO DE HORAS
Carlos;104;OPERADOR;B;CD2;FÉRIAS;FÉRIAS;FÉRIAS;FÉRIAS;FÉRIAS
";

fn request(csv: &str) -> ReportRequest {
    ReportRequest::new(SourceFile {
        name: "frequencia.csv".into(),
        bytes: csv.as_bytes().to_vec(),
        format: SourceFormat::Delimited {
            delimiter: b';',
            encoding: "utf-8".into(),
        },
    })
}

#[test]
fn joao_with_two_presences() {
    let report = summarize(&request("NOME;01/01;02/01\nJOÃO;PRESENTE;PRESENTE")).unwrap();

    let joao = report.summary.get("JOÃO").unwrap();
    assert_eq!(joao.status(Status::Present), 2);
    assert_eq!(joao.total_days, 2);
    assert_eq!(joao.attendance_percent, Some(100.0));
}

#[test]
fn one_row_per_employee() {
    let report = summarize(&request(SHEET)).unwrap();

    let names: Vec<&str> = report
        .summary
        .rows
        .iter()
        .map(|r| r.employee_name.as_str())
        .collect();
    assert_eq!(names, vec!["Ana Silva", "Bruno Costa", "Carlos", "MARIANA"]);
}

#[test]
fn row_conservation() {
    let report = summarize(&request(SHEET)).unwrap();

    // MATRICULA survives redaction and counts as a date column
    assert_eq!(report.summary.date_columns, 6);
    for row in &report.summary.rows {
        assert_eq!(row.cell_total() as usize, report.summary.date_columns);
    }
}

#[test]
fn duplicate_names_conserve_counts() {
    let report = summarize(&request(
        "NOME;01/01;02/01;03/01\nAna;PRESENTE;FALTA;DSR\nAna;PRESENTE;PRESENTE;DSR",
    ))
    .unwrap();

    assert_eq!(report.summary.len(), 1);
    let ana = &report.summary.rows[0];
    assert_eq!(ana.cell_total(), 6);
    assert_eq!(ana.status(Status::Present), 3);
    assert_eq!(ana.attendance_percent, Some(75.0));
}

#[test]
fn redaction_removes_exactly_the_anchor_block() {
    let report = summarize(&request("FUNÇÃO;X;UNIDADE;NOME;01/01\nOP;1;CD;Ana;PRESENTE")).unwrap();

    assert_eq!(report.source.redacted_columns, vec!["FUNÇÃO", "X", "UNIDADE"]);
    assert_eq!(report.source.columns, vec!["NOME", "01/01"]);
    assert_eq!(report.summary.date_columns, 1);
}

#[test]
fn vocabulary_columns_always_present() {
    let report = summarize(&request("NOME;01/01\nAna;PRESENTE")).unwrap();

    for status in Status::ALL {
        assert!(report.summary.status_columns.iter().any(|c| c == status.label()));
        assert_eq!(report.summary.rows[0].count(status.label()), if status == Status::Present { 1 } else { 0 });
    }
}

#[test]
fn blank_cells_and_unknown_labels_become_columns() {
    let report = summarize(&request(SHEET)).unwrap();

    assert!(report.summary.status_columns.iter().any(|c| c == "SEM REGISTRO"));
    assert_eq!(report.summary.get("MARIANA").unwrap().count("SEM REGISTRO"), 1);
    // MATRICULA values are opaque labels too
    assert_eq!(report.summary.get("Ana Silva").unwrap().count("101"), 1);
}

#[test]
fn percent_in_range_or_absent() {
    let report = summarize(&request(SHEET)).unwrap();

    for row in &report.summary.rows {
        match row.attendance_percent {
            Some(p) => {
                assert!((0.0..=100.0).contains(&p));
                assert!(row.total_days > 0);
            }
            None => assert_eq!(row.total_days, 0),
        }
    }
    assert_eq!(report.summary.get("Carlos").unwrap().attendance_percent, None);
    assert_eq!(report.summary.get("Ana Silva").unwrap().attendance_percent, Some(75.0));
    assert_eq!(report.summary.get("MARIANA").unwrap().attendance_percent, Some(50.0));
}

#[test]
fn all_categories_policy() {
    let report = summarize(&request(SHEET).with_policy(DenominatorPolicy::AllCategories)).unwrap();

    let ana = report.summary.get("Ana Silva").unwrap();
    assert_eq!(ana.total_days, 5);
    assert_eq!(ana.attendance_percent, Some(60.0));
    assert_eq!(report.summary.get("Carlos").unwrap().attendance_percent, Some(0.0));
}

#[test]
fn display_order_and_filter() {
    let report = summarize(&request(SHEET)).unwrap();

    let order: Vec<&str> = report
        .display_rows()
        .iter()
        .map(|r| r.employee_name.as_str())
        .collect();
    assert_eq!(order, vec!["Bruno Costa", "Ana Silva", "MARIANA", "Carlos"]);

    let filtered = summarize(&request(SHEET).with_filter("ana")).unwrap();
    let names: Vec<&str> = filtered
        .display_rows()
        .iter()
        .map(|r| r.employee_name.as_str())
        .collect();
    assert_eq!(names, vec!["Ana Silva", "MARIANA"]);

    // the filter never changes the summary itself
    assert_eq!(filtered.summary, report.summary);
}

#[test]
fn idempotent_summary() {
    let first = summarize(&request(SHEET)).unwrap();
    let second = summarize(&request(SHEET)).unwrap();

    assert_eq!(
        serde_json::to_string(&first.summary).unwrap(),
        serde_json::to_string(&second.summary).unwrap()
    );
}

#[test]
fn missing_identity_column_is_validation_error() {
    let err = summarize(&request("MATRICULA;01/01\n101;PRESENTE")).unwrap_err();

    match err {
        PipelineError::Validation(e) => {
            let message = e.to_string();
            assert!(message.contains("NOME"));
            assert!(message.contains("MATRICULA"));
        }
        other => panic!("expected validation error, got {other}"),
    }
}

#[test]
fn lowercase_headers_are_normalized() {
    let report = summarize(&request(" nome ;01/01\nAna;PRESENTE")).unwrap();
    assert_eq!(report.summary.len(), 1);
}

#[test]
fn latin1_file_on_disk() {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    // "NOME;01/01\nJOÃO;PRESENTE" in ISO-8859-1
    let mut bytes = b"NOME;01/01\nJO".to_vec();
    bytes.push(0xC3);
    bytes.extend_from_slice(b"O;PRESENTE\n");
    file.write_all(&bytes).unwrap();

    let mut config = AppConfig::default();
    config.input.encoding = "iso-8859-1".into();

    let report = summarize_file(file.path(), &config, None).unwrap();
    assert!(report.summary.get("JOÃO").is_some());
    assert_eq!(report.source.encoding.as_deref(), Some("iso-8859-1"));
}

#[test]
fn spreadsheet_input() {
    let mut workbook = rust_xlsxwriter::Workbook::new();
    let sheet = workbook.add_worksheet();
    for (c, h) in ["Nome", "01/01", "02/01"].iter().enumerate() {
        sheet.write_string(0, c as u16, *h).unwrap();
    }
    for (c, v) in ["Ana", "PRESENTE", "FALTA"].iter().enumerate() {
        sheet.write_string(1, c as u16, *v).unwrap();
    }
    let bytes = workbook.save_to_buffer().unwrap();

    let report = summarize(&ReportRequest::new(SourceFile {
        name: "frequencia.xlsx".into(),
        bytes,
        format: SourceFormat::Spreadsheet,
    }))
    .unwrap();

    assert_eq!(report.summary.get("Ana").unwrap().attendance_percent, Some(50.0));
    assert!(report.source.encoding.is_none());
}
