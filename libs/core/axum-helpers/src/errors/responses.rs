//! Reusable OpenAPI response types for the error envelope.

use super::ErrorResponse;
#[allow(unused_imports)]
use serde_json::json;
use utoipa::ToResponse;

#[derive(ToResponse)]
#[response(
    description = "Internal Server Error",
    content_type = "application/json",
    example = json!({
        "code": 1500,
        "error": "INTERNAL_ERROR",
        "message": "An internal server error occurred"
    })
)]
pub struct InternalServerErrorResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Bad Request - malformed or unsupported query parameters",
    content_type = "application/json",
    example = json!({
        "code": 1010,
        "error": "INVALID_QUERY",
        "message": "Invalid query parameters",
        "details": {
            "filter": ["malformed filter 'nameadmin': expected <column><operator><value> where operator is one of ==, !=, >=, <=, >, <, LIKE, ILIKE, IN, NOT IN, BETWEEN, NOT BETWEEN"]
        }
    })
)]
pub struct BadRequestQueryResponse(pub ErrorResponse);

/// 400 for lookups by id, which take both a path id and the query parameters.
#[derive(ToResponse)]
#[response(
    description = "Bad Request - invalid UUID, or malformed or unsupported query parameters",
    content_type = "application/json",
    examples(
        ("InvalidUuid" = (
            summary = "The path id is not a UUID",
            value = json!({
                "code": 1002,
                "error": "INVALID_UUID",
                "message": "Invalid UUID format",
                "details": { "id": ["'abc' is not a valid UUID"] }
            })
        )),
        ("UnsupportedQuery" = (
            summary = "An include, filter or sort the resource does not offer",
            value = json!({
                "code": 1011,
                "error": "UNSUPPORTED_QUERY",
                "message": "Unsupported query parameters",
                "details": { "filter": ["unknown filter column 'password'"] }
            })
        ))
    )
)]
pub struct BadRequestLookupResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Resource not found",
    content_type = "application/json",
    example = json!({
        "code": 1004,
        "error": "NOT_FOUND",
        "message": "Resource not found"
    })
)]
pub struct NotFoundResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Service Unavailable",
    content_type = "application/json",
    example = json!({
        "code": 1503,
        "error": "SERVICE_UNAVAILABLE",
        "message": "Service is temporarily unavailable"
    })
)]
pub struct ServiceUnavailableResponse(pub ErrorResponse);
