use super::*;

#[test]
fn canvas_missing_names_the_id() {
    let err = AppError::CanvasMissing("webgl".into());
    assert_eq!(err.to_string(), "canvas element #webgl not found");
}

#[test]
fn context_unavailable_quotes_the_kind() {
    let err = AppError::ContextUnavailable("webgl2".into());
    assert_eq!(err.to_string(), "rendering context \"webgl2\" is unavailable");
}

#[test]
fn shader_error_carries_info_log() {
    let err = AppError::Shader("0:3: syntax error".into());
    assert!(err.to_string().contains("0:3: syntax error"));
}

#[test]
fn errors_compare_by_variant_and_payload() {
    assert_eq!(AppError::Buffer, AppError::Buffer);
    assert_ne!(AppError::Link("a".into()), AppError::Link("b".into()));
    assert_ne!(AppError::WindowMissing, AppError::Buffer);
}
