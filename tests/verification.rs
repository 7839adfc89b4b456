//! End-to-end checks of the verification pipeline through a fixed-pose detector.

use approx::assert_relative_eq;

use visual_bmi::bmi::{BmiCategory, DeclaredBody};
use visual_bmi::body::{classify_orientation, is_full_body, Orientation, REQUIRED_LANDMARKS};
use visual_bmi::pipeline::{verify_pose, verify_pose_pair};
use visual_bmi::pose::{FixedPoseDetector, Landmark, LandmarkDetector, LandmarkIndex, Pose};
use visual_bmi::result::OrientationReport;
use visual_bmi::verify::VerificationPolicy;
use visual_bmi::{BmiResponse, BmiVerifier, ErrorKind};

/// 鼻 y=nose_y、かかと y=heel_y、肩の左右 x を指定した全身 Pose
fn full_body_pose(nose_y: f32, heel_y: f32, shoulder_x: (f32, f32)) -> Pose {
    let mut pose = Pose::default();
    for idx in REQUIRED_LANDMARKS {
        pose.set(idx, Landmark::new(0.5, 0.6, 0.0, 0.95));
    }
    pose.set(LandmarkIndex::Nose, Landmark::new(0.5, nose_y, -0.3, 0.99));
    pose.set(LandmarkIndex::LeftHeel, Landmark::new(0.45, heel_y, 0.05, 0.9));
    pose.set(LandmarkIndex::RightHeel, Landmark::new(0.55, heel_y, 0.05, 0.9));
    pose.set(LandmarkIndex::LeftShoulder, Landmark::new(shoulder_x.0, 0.25, 0.0, 0.95));
    pose.set(LandmarkIndex::RightShoulder, Landmark::new(shoulder_x.1, 0.25, 0.0, 0.95));
    pose
}

/// body_ratio = 0.8 / 0.4 = 2.0
fn reference_pose() -> Pose {
    full_body_pose(0.1, 0.9, (0.3, 0.7))
}

#[test]
fn test_reference_scenario_is_verified() {
    let mut verifier = BmiVerifier::new(
        FixedPoseDetector::new(reference_pose()),
        VerificationPolicy::default(),
    );
    let result = verifier.verify_image(b"photo", 170.0, 70.0).unwrap();

    assert_eq!(result.declared_bmi, 24.22);
    assert_eq!(result.bmi_category, BmiCategory::NormalWeight);
    assert_eq!(result.visual_bmi, 24.22);
    assert!(result.bmi_verified);
    assert_eq!(result.verification_result, "Verification passed");
    assert_eq!(result.input_height_cm, 170.0);
    assert_eq!(result.input_weight_kg, 70.0);
    assert!(result.verified_event(1).is_some());
}

#[test]
fn test_mismatch_is_flagged() {
    // 肩幅が広い (body_ratio ≈ 1.33) → 推定身長 ≈ 1.57m、申告 1.9m と大きく外れる
    let pose = full_body_pose(0.1, 0.9, (0.2, 0.8));
    let declared = DeclaredBody::new(190.0, 60.0).unwrap();
    let result = verify_pose(&pose, declared, &VerificationPolicy::default()).unwrap();

    assert_eq!(result.declared_bmi, 16.62);
    assert_eq!(result.bmi_category, BmiCategory::Underweight);
    assert_relative_eq!(result.visual_bmi, 24.45, epsilon = 1e-9);
    assert!(!result.bmi_verified);
    assert_eq!(
        result.verification_result,
        format!("Mismatch - BMI discrepancy ({:.2})", result.bmi_difference)
    );
    assert!(result.verified_event(1).is_none());
}

#[test]
fn test_pair_of_identical_views_matches_single() {
    let declared = DeclaredBody::new(165.0, 82.0).unwrap();
    let policy = VerificationPolicy::default();
    let pose = full_body_pose(0.12, 0.93, (0.38, 0.62));

    let single = verify_pose(&pose, declared, &policy).unwrap();
    let pair = verify_pose_pair(&pose, &pose, declared, &policy).unwrap();

    assert_eq!(pair.declared_bmi, single.declared_bmi);
    assert_eq!(pair.visual_bmi, single.visual_bmi);
    assert_eq!(pair.visual_height_ratio, single.visual_height_ratio);
    assert_eq!(pair.shoulder_width_ratio, single.shoulder_width_ratio);
    assert_eq!(pair.bmi_difference, single.bmi_difference);
    assert_eq!(pair.bmi_verified, single.bmi_verified);
    assert_eq!(pair.verification_result, single.verification_result);
    assert_eq!(
        pair.orientation,
        OrientationReport::Pair {
            orientation_front: Orientation::Front,
            orientation_back: Orientation::Front,
        }
    );
}

#[test]
fn test_pair_averages_ratios() {
    let front = full_body_pose(0.1, 0.9, (0.3, 0.7)); // 0.8 / 0.4
    let back = full_body_pose(0.2, 0.8, (0.4, 0.6)); // 0.6 / 0.2
    let declared = DeclaredBody::new(170.0, 70.0).unwrap();
    let result = verify_pose_pair(&front, &back, declared, &VerificationPolicy::default()).unwrap();

    assert_eq!(result.visual_height_ratio, 0.7);
    assert_eq!(result.shoulder_width_ratio, 0.3);
}

#[test]
fn test_pair_fails_when_either_view_fails() {
    let good = reference_pose();
    let mut partial = reference_pose();
    partial.set(LandmarkIndex::LeftKnee, Landmark::new(0.5, 0.7, 0.0, 0.4));

    let declared = DeclaredBody::new(170.0, 70.0).unwrap();
    let policy = VerificationPolicy::default();

    let err = verify_pose_pair(&good, &partial, declared, &policy).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::IncompleteBody);
    assert!(err.to_string().starts_with("Full-body pose required in back image."));

    let err = verify_pose_pair(&partial, &good, declared, &policy).unwrap_err();
    assert!(err.to_string().starts_with("Full-body pose required in front image."));
}

#[test]
fn test_zero_shoulder_width_is_rejected() {
    let pose = full_body_pose(0.1, 0.9, (0.5, 0.5));
    let mut verifier = BmiVerifier::new(FixedPoseDetector::new(pose), VerificationPolicy::default());
    let response = BmiResponse::from(verifier.verify_image(b"photo", 170.0, 70.0));

    match response {
        BmiResponse::Rejected { kind, .. } => assert_eq!(kind, ErrorKind::DegeneratePose),
        BmiResponse::Measured(r) => panic!("expected rejection, got {:?}", r),
    }
}

#[test]
fn test_zero_height_ratio_is_rejected() {
    let pose = full_body_pose(0.5, 0.5, (0.3, 0.7));
    let declared = DeclaredBody::new(170.0, 70.0).unwrap();
    let err = verify_pose(&pose, declared, &VerificationPolicy::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DegeneratePose);
}

#[test]
fn test_no_pose_detected() {
    let mut verifier = BmiVerifier::new(FixedPoseDetector::empty(), VerificationPolicy::default());
    let err = verifier.verify_image_pair(b"f", b"b", 170.0, 70.0).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NoPoseDetected);
    assert_eq!(err.to_string(), "Pose not detected in front image");
}

#[test]
fn test_gate_boundary() {
    let mut pose = reference_pose();
    for idx in REQUIRED_LANDMARKS {
        let mut lm = *pose.get(idx);
        lm.visibility = 0.5;
        pose.set(idx, lm);
    }
    assert!(is_full_body(&pose));

    let mut lm = *pose.get(LandmarkIndex::RightHip);
    lm.visibility = 0.4;
    pose.set(LandmarkIndex::RightHip, lm);
    assert!(!is_full_body(&pose));
}

#[test]
fn test_orientation_is_deterministic() {
    let pose = reference_pose();
    let first = classify_orientation(&pose);
    for _ in 0..10 {
        assert_eq!(classify_orientation(&pose), first);
    }

    let side = full_body_pose(0.1, 0.9, (0.48, 0.53));
    assert_eq!(classify_orientation(&side), Orientation::Side);
}

#[test]
fn test_invalid_declared_input() {
    let mut verifier = BmiVerifier::new(
        FixedPoseDetector::new(reference_pose()),
        VerificationPolicy::default(),
    );
    for (h, w) in [(0.0, 70.0), (170.0, 0.0), (-1.0, 70.0)] {
        let err = verifier.verify_image(b"photo", h, w).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidDeclaredInput);
    }
}

#[test]
fn test_boxed_detector_in_verifier() {
    let detector: Box<dyn LandmarkDetector> = Box::new(FixedPoseDetector::new(reference_pose()));
    let mut verifier = BmiVerifier::new(detector, VerificationPolicy::new(0.5));
    assert!(verifier.verify_image(b"photo", 170.0, 70.0).unwrap().bmi_verified);
}

#[test]
fn test_image_pair_matches_pose_pair() {
    let pose = full_body_pose(0.12, 0.93, (0.38, 0.62));
    let policy = VerificationPolicy::default();
    let declared = DeclaredBody::new(165.0, 82.0).unwrap();

    let mut verifier = BmiVerifier::new(FixedPoseDetector::new(pose.clone()), policy);
    let from_images = verifier.verify_image_pair(b"f", b"b", 165.0, 82.0).unwrap();
    let from_poses = verify_pose_pair(&pose, &pose, declared, &policy).unwrap();
    assert_eq!(from_images, from_poses);
}
