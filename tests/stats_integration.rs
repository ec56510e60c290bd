//! Questionnaire group comparison end-to-end

use std::path::Path;

use skylog::stats::{kruskal_wallis, OmnibusTest, StatsError};
use skylog::{compare_all, GroupDataset, Thresholds};

const THRESHOLDS: Thresholds = Thresholds {
    normality_alpha: 0.005,
    group_alpha: 0.05,
};

fn dims() -> Vec<String> {
    ["Presence", "Spatial Presence", "Involvement", "Realness", "IPQ Score"]
        .iter()
        .map(ToString::to_string)
        .collect()
}

fn files() -> Vec<String> {
    ["Joysticks_Monitor.csv", "Joysticks_HMD.csv", "Headset.csv"]
        .iter()
        .map(ToString::to_string)
        .collect()
}

/// Six participants per group; `shift` moves every score up.
fn write_group(dir: &Path, file: &str, shift: f64) {
    let mut text = String::from("Participant,Presence,Spatial Presence,Involvement,Realness,IPQ Score\n");
    let base = [2.0, 2.5, 3.0, 3.5, 4.0, 4.5];
    for (i, b) in base.iter().enumerate() {
        let v = b + shift;
        text.push_str(&format!(
            "P{i},{v},{},{},{},{}\n",
            v + 0.1,
            v - 0.2,
            v * 0.9,
            (v + 0.1 + v - 0.2 + v * 0.9) / 3.0
        ));
    }
    std::fs::write(dir.join(file), text).unwrap();
}

#[test]
fn all_dimensions_are_compared() {
    let dir = tempfile::tempdir().unwrap();
    write_group(dir.path(), "Joysticks_Monitor.csv", 0.0);
    write_group(dir.path(), "Joysticks_HMD.csv", 0.5);
    write_group(dir.path(), "Headset.csv", 3.0);

    let dataset = GroupDataset::load(dir.path(), &files(), &dims()).unwrap();
    assert_eq!(
        dataset.group_names(),
        vec!["Joysticks_Monitor", "Joysticks_HMD", "Headset"]
    );

    let reports = compare_all(&dataset, &dims(), THRESHOLDS).unwrap();
    assert_eq!(reports.len(), 5);
    for report in &reports {
        // evenly spaced scores pass Shapiro-Wilk
        assert!(report.all_normal, "{}", report.dimension);
        assert_eq!(report.test, OmnibusTest::Anova);
        assert!(report.significant, "{}", report.dimension);
        assert_eq!(report.pairwise.len(), 3);

        let monitor_vs_headset = report
            .pairwise
            .iter()
            .find(|p| p.group_a == "Joysticks_Monitor" && p.group_b == "Headset")
            .unwrap();
        assert_eq!(monitor_vs_headset.u_statistic, 0.0);
        assert!(monitor_vs_headset.p_adjusted < 0.05);
        assert_ne!(monitor_vs_headset.stars, "ns");

        let monitor_vs_hmd = &report.pairwise[0];
        assert_eq!(monitor_vs_hmd.stars, "ns");
    }

    let json = serde_json::to_value(&reports).unwrap();
    assert_eq!(json[0]["dimension"], "Presence");
    assert_eq!(json[0]["test"], "Anova");
}

#[test]
fn kruskal_wallis_on_loaded_groups_matches_reference() {
    let dir = tempfile::tempdir().unwrap();
    for (file, values) in [
        ("A.csv", "12.1\n12.3\n12.2\n12.5\n"),
        ("B.csv", "10.5\n10.8\n10.6\n10.7\n"),
        ("C.csv", "14.0\n14.2\n14.1\n14.3\n"),
    ] {
        std::fs::write(dir.path().join(file), format!("Value\n{values}")).unwrap();
    }
    let files: Vec<String> = ["A.csv", "B.csv", "C.csv"].iter().map(ToString::to_string).collect();
    let dims = vec!["Value".to_string()];
    let dataset = GroupDataset::load(dir.path(), &files, &dims).unwrap();

    let outcome = kruskal_wallis(&dataset.dimension("Value").unwrap()).unwrap();
    assert!((outcome.statistic - 9.846).abs() < 1e-3, "{outcome:?}");
    assert!((outcome.p_value - 0.007_28).abs() < 1e-5, "{outcome:?}");
}

#[test]
fn missing_dimension_column_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("A.csv"), "Presence\n1\n2\n3\n").unwrap();
    let err = GroupDataset::load(
        dir.path(),
        &["A.csv".to_string()],
        &["Presence".to_string(), "Realness".to_string()],
    )
    .unwrap_err();
    assert!(matches!(err, StatsError::MissingColumn { ref group, .. } if group == "A"));
}

#[test]
fn too_few_participants_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("A.csv"), "Presence\n1\n2\n").unwrap();
    std::fs::write(dir.path().join("B.csv"), "Presence\n3\n4\n5\n").unwrap();
    let dataset = GroupDataset::load(
        dir.path(),
        &["A.csv".to_string(), "B.csv".to_string()],
        &["Presence".to_string()],
    )
    .unwrap();
    let err = compare_all(&dataset, &["Presence".to_string()], THRESHOLDS).unwrap_err();
    assert!(matches!(err, StatsError::SampleSize { got: 2, .. }));
}
