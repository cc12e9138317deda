// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::cell::RefCell;

use vec1::vec1;

use super::*;

/// Records every script it's asked to run and replies with canned stdout.
struct MockRunner {
    stdout: String,
    calls: RefCell<Vec<(&'static str, String)>>,
}

impl MockRunner {
    fn new(stdout: &str) -> Self {
        Self {
            stdout: stdout.to_string(),
            calls: RefCell::new(vec![]),
        }
    }
}

impl TaskRunner for MockRunner {
    fn run_script(&self, task: &'static str, script: &str) -> Result<String, CasaError> {
        self.calls.borrow_mut().push((task, script.to_string()));
        Ok(self.stdout.clone())
    }
}

#[test]
fn py_str_escapes_quotes_and_backslashes() {
    assert_eq!(py_str("myobs.ms"), "'myobs.ms'");
    assert_eq!(py_str("it's"), r"'it\'s'");
    assert_eq!(py_str(r"a\b"), r"'a\\b'");
}

#[test]
fn py_path_list_formats_a_python_list() {
    let paths = vec![
        PathBuf::from("880~960MHz/a.ms"),
        PathBuf::from("960~1040MHz/a.ms"),
    ];
    assert_eq!(
        py_path_list(&paths),
        "['880~960MHz/a.ms', '960~1040MHz/a.ms']"
    );
}

#[test]
fn field_names_parses_marker_lines_out_of_noise() {
    let stdout = "\
Some CASA banner
FIELDNAME 2 deep2
spurious output
FIELDNAME 5 J0408-6545
";
    let runner = MockRunner::new(stdout);
    let names = field_names(&runner, Path::new("myobs.ms"), &vec1![2, 5]).unwrap();
    assert_eq!(names.to_vec(), vec!["deep2", "J0408-6545"]);

    let calls = runner.calls.borrow();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "msmd");
    assert!(calls[0].1.contains("msmd.open('myobs.ms')"));
    assert!(calls[0].1.contains("for i in [2, 5]:"));
    assert!(calls[0].1.contains("msmd.done()"));
}

#[test]
fn field_names_errors_on_missing_field() {
    let runner = MockRunner::new("FIELDNAME 2 deep2\n");
    let result = field_names(&runner, Path::new("myobs.ms"), &vec1![2, 3]);
    assert!(matches!(
        result,
        Err(CasaError::MissingFieldName { field: 3 })
    ));
}

#[test]
fn imageconcat_builds_the_expected_call() {
    let runner = MockRunner::new("");
    let infiles = vec![
        PathBuf::from("880~960MHz/images/myobs.deep2.image"),
        PathBuf::from("960~1040MHz/images/myobs.deep2.image"),
    ];
    imageconcat(&runner, &infiles, Path::new("myobs.deep2.contcube")).unwrap();

    let calls = runner.calls.borrow();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "imageconcat");
    assert!(calls[0].1.contains(
        "ia.imageconcat(infiles=['880~960MHz/images/myobs.deep2.image', \
         '960~1040MHz/images/myobs.deep2.image'], outfile='myobs.deep2.contcube', \
         axis=-1, relax=True)"
    ));
    assert!(calls[0].1.contains("ia.close()"));
}

#[test]
fn concat_and_virtualconcat_build_the_expected_calls() {
    let runner = MockRunner::new("");
    let vis = vec![
        PathBuf::from("880~960MHz/myobs.deep2.ms"),
        PathBuf::from("960~1040MHz/myobs.deep2.ms"),
    ];
    concat(&runner, &vis, Path::new("myobs.deep2.ms")).unwrap();
    virtualconcat(&runner, &vis, Path::new("myobs.deep2.mms")).unwrap();

    let calls = runner.calls.borrow();
    assert_eq!(calls[0].0, "concat");
    assert!(calls[0]
        .1
        .starts_with("concat(vis=['880~960MHz/myobs.deep2.ms'"));
    assert!(calls[0].1.contains("concatvis='myobs.deep2.ms')"));
    assert_eq!(calls[1].0, "virtualconcat");
    assert!(calls[1].1.contains("concatvis='myobs.deep2.mms')"));
}

#[test]
fn exportfits_builds_the_expected_call() {
    let runner = MockRunner::new("");
    exportfits(
        &runner,
        Path::new("myobs.deep2.contcube"),
        Path::new("myobs.deep2.contcube.fits"),
    )
    .unwrap();

    let calls = runner.calls.borrow();
    assert_eq!(calls[0].0, "exportfits");
    assert_eq!(
        calls[0].1.trim(),
        "exportfits(imagename='myobs.deep2.contcube', fitsimage='myobs.deep2.contcube.fits')"
    );
}
