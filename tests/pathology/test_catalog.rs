// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Built-in pathology catalog behaviour through the public API

use hoppr_dicom_gateway::pathology::{PathologyCatalog, DEFAULT_PATHOLOGY};

use crate::support::model_for;

#[test]
fn test_builtin_catalog_order_and_models() {
    let catalog = PathologyCatalog::default();
    assert_eq!(catalog.len(), 13);
    assert_eq!(
        catalog.list_pathologies(),
        vec![
            "atelectasis",
            "pneumothorax",
            "cardiomegaly",
            "lung_opacity",
            "pleural_effusion",
            "consolidation",
            "infiltration",
            "pleural_thickening",
            "aortic_enlargement",
            "calcification",
            "pulmonary_fibrosis",
            "ild",
            "normal",
        ]
    );

    for (pathology, model_id) in catalog.iter() {
        assert_eq!(model_id, model_for(pathology));
    }
    assert_eq!(catalog.all_models().len(), 13);
}

#[test]
fn test_default_is_atelectasis() {
    let catalog = PathologyCatalog::default();
    assert_eq!(DEFAULT_PATHOLOGY, "atelectasis");
    assert_eq!(catalog.default_pathology(), "atelectasis");
    assert_eq!(catalog.default_model(), model_for("atelectasis"));
}

#[test]
fn test_resolve_variants() {
    let catalog = PathologyCatalog::default();
    let expected = model_for("pleural_effusion");

    for name in [
        "pleural_effusion",
        "Pleural Effusion",
        "PLEURAL-EFFUSION",
        "  pleural effusion  ",
    ] {
        assert_eq!(catalog.resolve_model(name), expected, "{}", name);
    }
    assert_eq!(catalog.resolve_model("pneumo thorax"), model_for("pneumothorax"));
}

#[test]
fn test_unknown_names_fall_back_or_fail() {
    let catalog = PathologyCatalog::default();

    assert_eq!(catalog.resolve_model("unknown_xyz"), model_for("atelectasis"));
    assert_eq!(catalog.resolve_model(""), model_for("atelectasis"));

    let err = catalog.resolve_model_strict("unknown_xyz").unwrap_err();
    assert_eq!(err.requested, "unknown_xyz");
    assert_eq!(err.available.len(), 13);
    assert_eq!(err.to_string(), "Unknown pathology 'unknown_xyz'");
}

#[test]
fn test_detect_from_filename() {
    let catalog = PathologyCatalog::default();

    assert_eq!(
        catalog.detect_from_filename("patient_PNEUMOTHORAX_02.DCM"),
        "pneumothorax"
    );
    assert_eq!(
        catalog.detect_from_filename("Lung Opacity study.dcm"),
        "lung_opacity"
    );
    assert_eq!(
        catalog.detect_from_filename("/data/pleuraleffusion-007.dcm"),
        "pleural_effusion"
    );
    assert_eq!(catalog.detect_from_filename("scan_0001.dcm"), "atelectasis");
}

#[test]
fn test_detect_uses_catalog_order() {
    let catalog = PathologyCatalog::default();
    // both names present: the earlier catalog entry wins
    assert_eq!(
        catalog.detect_from_filename("cardiomegaly_with_pneumothorax.dcm"),
        "pneumothorax"
    );
}

#[test]
fn test_entries_carry_display_names() {
    let catalog = PathologyCatalog::default();
    let entries = catalog.entries();
    assert_eq!(entries.len(), 13);
    assert_eq!(entries[8].key, "aortic_enlargement");
    assert_eq!(entries[8].display_name, "Aortic Enlargement");
    assert_eq!(entries[11].display_name, "Ild");
}

#[test]
fn test_reverse_lookup() {
    let catalog = PathologyCatalog::default();
    assert_eq!(
        catalog.pathology_for_model(&model_for("calcification")),
        Some("calcification")
    );
    assert_eq!(catalog.pathology_for_model("custom:v1"), None);
}
