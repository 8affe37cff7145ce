use ember::models::Arch;
use ember::weights::{self, MODEL_DIR_ENV};
use ember::EmberError;

// Environment manipulation is process wide, so everything lives in a single
// test.
#[test]
fn weight_resolution() {
    std::env::remove_var(MODEL_DIR_ENV);
    assert!(matches!(weights::model_dir().unwrap_err(), EmberError::ModelDirUnset(_)));
    assert!(matches!(weights::weight_path(Arch::Resnet18).unwrap_err(), EmberError::ModelDirUnset(_)));

    let dir = std::env::temp_dir().join(format!("ember_{}_models", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    std::env::set_var(MODEL_DIR_ENV, &dir);

    let err = weights::weight_path(Arch::Resnet18).unwrap_err();
    assert!(matches!(err, EmberError::WeightsNotFound(path) if path == dir.join("resnet18.ot")));

    std::fs::write(dir.join("resnet18.ot"), b"stub").unwrap();
    assert_eq!(weights::weight_path(Arch::Resnet18).unwrap(), dir.join("resnet18.ot"));

    std::env::remove_var(MODEL_DIR_ENV);
    std::fs::remove_dir_all(dir).unwrap();
}
