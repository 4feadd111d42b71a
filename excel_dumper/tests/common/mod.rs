#![allow(dead_code)]

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use rust_xlsxwriter::{ExcelDateTime, Format, Formula, Workbook};

/// "Visible" holds a header, two data rows, a blank row and a SUM formula;
/// "Secret" is hidden and holds one cell.
pub fn sales_workbook(path: &Path) {
    let mut workbook = Workbook::new();

    let sheet = workbook.add_worksheet();
    sheet.set_name("Visible").unwrap();
    sheet.write(0, 0, "Item").unwrap();
    sheet.write(0, 1, "Qty").unwrap();
    sheet.write(1, 0, "apples").unwrap();
    sheet.write(1, 1, 10.0).unwrap();
    sheet.write(3, 0, "pears").unwrap();
    sheet.write(3, 1, 20.0).unwrap();
    sheet
        .write_formula(4, 1, Formula::new("=SUM(B2:B4)").set_result("30"))
        .unwrap();

    let secret = workbook.add_worksheet();
    secret.set_name("Secret").unwrap().set_hidden(true);
    secret.write(0, 0, "classified").unwrap();

    workbook.save(path).unwrap();
}

pub fn empty_workbook(path: &Path) {
    let mut workbook = Workbook::new();
    workbook.add_worksheet().set_name("Nothing").unwrap();
    workbook.add_worksheet().set_name("Still nothing").unwrap();
    workbook.save(path).unwrap();
}

pub fn dated_workbook(path: &Path) {
    let mut workbook = Workbook::new();
    let date_format = Format::new().set_num_format("yyyy-mm-dd");
    let sheet = workbook.add_worksheet();
    sheet.set_name("Dates").unwrap();
    sheet.write(0, 0, "due").unwrap();
    sheet
        .write_datetime_with_format(
            0,
            1,
            &ExcelDateTime::from_ymd(2024, 1, 15).unwrap(),
            &date_format,
        )
        .unwrap();
    sheet.write(0, 2, true).unwrap();
    workbook.save(path).unwrap();
}

/// One row spanning A1:C1 and a second row whose only value is in C2.
pub fn wide_workbook(path: &Path) {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Wide").unwrap();
    sheet.write(0, 0, "a").unwrap();
    sheet.write(0, 1, "b").unwrap();
    sheet.write(0, 2, "c").unwrap();
    sheet.write(1, 2, "only-in-C2").unwrap();
    workbook.save(path).unwrap();
}

/// "Broken" (first sheet) has its worksheet XML cut off mid-row; "Good" is intact.
pub fn workbook_with_broken_sheet(path: &Path) {
    let intact = path.with_extension("intact.xlsx");
    let mut workbook = Workbook::new();
    let broken = workbook.add_worksheet();
    broken.set_name("Broken").unwrap();
    broken.write(0, 0, "lost").unwrap();
    let good = workbook.add_worksheet();
    good.set_name("Good").unwrap();
    good.write(0, 0, "kept").unwrap();
    good.write(1, 1, 2.0).unwrap();
    workbook.save(&intact).unwrap();

    // Copy the package, replacing sheet1.xml with truncated XML
    let mut archive = zip::ZipArchive::new(File::open(&intact).unwrap()).unwrap();
    let mut writer = zip::ZipWriter::new(File::create(path).unwrap());
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).unwrap();
        let name = entry.name().to_string();
        let mut data = Vec::new();
        entry.read_to_end(&mut data).unwrap();
        if name == "xl/worksheets/sheet1.xml" {
            data = br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData><row r="1"><c r="A1" t="inlineStr"><is><t>lo"#
                .to_vec();
        }
        writer
            .start_file(name, zip::write::FileOptions::default())
            .unwrap();
        writer.write_all(&data).unwrap();
    }
    writer.finish().unwrap();
    fs::remove_file(&intact).unwrap();
}

/// Files directly inside `dir`, sorted by name.
pub fn files_in(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .filter(|path| path.is_file())
        .collect();
    files.sort();
    files
}
