/*!
 * Tests for error types and conversions
 */

use lingoplay::errors::{AppError, LookupError, ProviderError};

#[test]
fn test_lookupError_missingApiKey_shouldAskForSettings() {
    assert_eq!(
        LookupError::MissingApiKey.to_string(),
        "API Key is missing. Please configure it in settings."
    );
}

#[test]
fn test_lookupError_fromProviderError_shouldWrapMessage() {
    let error: LookupError = ProviderError::RateLimitExceeded("slow down".to_string()).into();

    assert!(matches!(error, LookupError::Provider(ProviderError::RateLimitExceeded(_))));
    assert_eq!(error.to_string(), "Provider error: Rate limit exceeded: slow down");
}

#[test]
fn test_providerError_apiError_shouldIncludeStatus() {
    let error = ProviderError::ApiError {
        status_code: 404,
        message: "Model or endpoint not found".to_string(),
    };

    assert_eq!(
        error.to_string(),
        "API responded with error: 404 - Model or endpoint not found"
    );
}

#[test]
fn test_appError_conversions_shouldPickVariant() {
    let io: AppError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
    assert!(matches!(io, AppError::File(_)));

    let lookup: AppError = LookupError::MissingApiKey.into();
    assert!(matches!(lookup, AppError::Lookup(_)));

    let other: AppError = anyhow::anyhow!("boom").into();
    assert_eq!(other.to_string(), "Unknown error: boom");

    let storage: AppError = rusqlite::Error::QueryReturnedNoRows.into();
    assert!(matches!(storage, AppError::Storage(_)));
}
