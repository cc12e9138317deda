// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::fs::{create_dir_all, write};

use clap::Parser;
use indoc::formatdoc;
use tempfile::TempDir;

use super::ConcatArgs;

#[test]
fn cli_args_parse_into_params() {
    let tmp = TempDir::new().unwrap();
    let vis = tmp.path().join("myobs.ms");
    create_dir_all(&vis).unwrap();
    let vis_string = vis.display().to_string();

    #[rustfmt::skip]
    let args = vec![
        "concat",
        "--data", &vis_string,
        "--fields", "2,3",
    ];
    let params = ConcatArgs::parse_from(args).parse().unwrap();

    assert_eq!(params.vis, vis);
    assert_eq!(params.filebase, "myobs");
    assert_eq!(params.fields.to_vec(), vec![2, 3]);
    assert_eq!(params.dir, std::path::PathBuf::from("."));
    assert!(params.export_fits);
}

#[test]
fn missing_vis_is_an_error() {
    let result = ConcatArgs::parse_from(["concat", "--fields", "2"]).parse();
    let err = result.err().expect("should refuse to run without a MS");
    assert!(err.to_string().contains("No input measurement set"));
}

#[test]
fn nonexistent_vis_is_an_error() {
    #[rustfmt::skip]
    let args = vec![
        "concat",
        "--data", "/does/not/exist.ms",
        "--fields", "2",
    ];
    let result = ConcatArgs::parse_from(args).parse();
    assert!(result.err().unwrap().to_string().contains("doesn't exist"));
}

#[test]
fn bad_field_ids_are_an_error() {
    let tmp = TempDir::new().unwrap();
    let vis = tmp.path().join("myobs.ms");
    create_dir_all(&vis).unwrap();
    let vis_string = vis.display().to_string();

    #[rustfmt::skip]
    let args = vec![
        "concat",
        "--data", &vis_string,
        "--fields", "2,deep2",
    ];
    let result = ConcatArgs::parse_from(args).parse();
    assert!(result.err().unwrap().to_string().contains("'deep2'"));
}

#[test]
fn arg_file_supplies_arguments() {
    let tmp = TempDir::new().unwrap();
    let vis = tmp.path().join("myobs.ms");
    create_dir_all(&vis).unwrap();

    let arg_file = tmp.path().join("concat.toml");
    write(
        &arg_file,
        formatdoc! {r#"
            [data]
            vis = "{vis}"

            [fields]
            targetfields = "2"

            [casa]
            bin = "/opt/casa/bin/casa"
        "#, vis = vis.display()},
    )
    .unwrap();
    let arg_file_string = arg_file.display().to_string();

    let args = ConcatArgs::parse_from(["concat", arg_file_string.as_str()])
        .merge()
        .unwrap();
    assert_eq!(args.data_args.vis.as_deref(), Some(vis.as_path()));
    assert_eq!(args.field_args.targetfields.as_deref(), Some("2"));
    assert_eq!(
        args.casa_args.bin.as_deref(),
        Some(std::path::Path::new("/opt/casa/bin/casa"))
    );
}

#[test]
fn cli_arguments_override_the_arg_file() {
    let tmp = TempDir::new().unwrap();
    let vis = tmp.path().join("myobs.ms");
    create_dir_all(&vis).unwrap();

    let arg_file = tmp.path().join("concat.toml");
    write(
        &arg_file,
        formatdoc! {r#"
            [data]
            vis = "{vis}"

            [fields]
            targetfields = "2"
        "#, vis = vis.display()},
    )
    .unwrap();
    let arg_file_string = arg_file.display().to_string();

    #[rustfmt::skip]
    let args = vec![
        "concat",
        &arg_file_string,
        "--fields", "3",
    ];
    let merged = ConcatArgs::parse_from(args).merge().unwrap();
    assert_eq!(merged.field_args.targetfields.as_deref(), Some("3"));

    let params = merged.parse().unwrap();
    assert_eq!(params.fields.to_vec(), vec![3]);
}

#[test]
fn unrecognised_arg_file_extension_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let arg_file = tmp.path().join("concat.ini");
    write(&arg_file, "[data]\nvis = x\n").unwrap();
    let arg_file_string = arg_file.display().to_string();

    let result = ConcatArgs::parse_from(["concat", arg_file_string.as_str()]).merge();
    assert!(result
        .err()
        .unwrap()
        .to_string()
        .contains("recognised file extension"));
}

#[test]
fn dry_run_never_touches_the_toolkit() {
    let tmp = TempDir::new().unwrap();
    let vis = tmp.path().join("myobs.ms");
    create_dir_all(&vis).unwrap();
    let vis_string = vis.display().to_string();

    // A CASA binary that can't exist; a dry run must not try to run it.
    #[rustfmt::skip]
    let args = vec![
        "concat",
        "--data", &vis_string,
        "--fields", "2",
        "--casa", "/does/not/exist/casa",
    ];
    ConcatArgs::parse_from(args).run(true).unwrap();
}
