use std::collections::BTreeMap;

use actix_web::{body::BoxBody, error::{JsonPayloadError, PathError, QueryPayloadError}, http::StatusCode, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};
use validator::ValidationErrors;

use crate::utils::PageQuery;

pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Uniform body of every API response: `{ success, message, data?, errors? }`.
#[derive(Serialize, Deserialize, Debug)]
pub struct ApiResponse<T>{
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self{
        Self{
            success: true,
            message: message.into(),
            data: Some(data),
            errors: None
        }
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self{
        Self{
            success: true,
            message: message.into(),
            data: None,
            errors: None
        }
    }

    pub fn error(message: impl Into<String>) -> Self{
        Self{
            success: false,
            message: message.into(),
            data: None,
            errors: None
        }
    }

    pub fn validation(message: impl Into<String>, errors: FieldErrors) -> Self{
        Self{
            success: false,
            message: message.into(),
            data: None,
            errors: Some(errors)
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct Paginated<T>{
    pub items: Vec<T>,
    pub page: i64,
    pub limit: i64
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, page: &PageQuery) -> Self{
        Self{
            items,
            page: page.page(),
            limit: page.limit()
        }
    }
}

// Error envelope with the given status, shared by every ResponseError impl
pub fn error_response(status: StatusCode, message: impl Into<String>) -> HttpResponse<BoxBody>{
    HttpResponse::build(status).json(ApiResponse::error(message))
}

pub fn validation_response(errors: &FieldErrors) -> HttpResponse<BoxBody>{
    HttpResponse::BadRequest().json(ApiResponse::validation("Validation failed", errors.clone()))
}

pub fn validation_errors(errors: &ValidationErrors) -> FieldErrors{
    let mut fields = FieldErrors::new();

    for (field, field_errors) in errors.field_errors() {
        let messages = field_errors
            .iter()
            .map(|e| match &e.message {
                Some(message) => message.to_string(),
                None => format!("{} is invalid ({})", field, e.code)
            })
            .collect();

        fields.insert(field.to_string(), messages);
    }

    fields
}

// Single field error, for checks done outside of validator derives
pub fn field_error(field: &str, message: impl Into<String>) -> FieldErrors{
    let mut fields = FieldErrors::new();
    fields.insert(field.to_string(), vec![message.into()]);
    fields
}

// Field errors of a derived validation, empty when the input is valid
pub fn collect_errors(result: Result<(), ValidationErrors>) -> FieldErrors{
    match result {
        Ok(()) => FieldErrors::new(),
        Err(e) => validation_errors(&e)
    }
}

pub fn push_error(errors: &mut FieldErrors, field: &str, message: impl Into<String>){
    errors.entry(field.to_string()).or_default().push(message.into());
}

pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error{
    let message = format!("Invalid JSON body: {}", err);
    let response = error_response(StatusCode::BAD_REQUEST, message);
    actix_web::error::InternalError::from_response(err, response).into()
}

pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error{
    let message = format!("Invalid query string: {}", err);
    let response = error_response(StatusCode::BAD_REQUEST, message);
    actix_web::error::InternalError::from_response(err, response).into()
}

pub fn path_error_handler(err: PathError, _req: &HttpRequest) -> actix_web::Error{
    let message = format!("Invalid path parameter: {}", err);
    let response = error_response(StatusCode::NOT_FOUND, message);
    actix_web::error::InternalError::from_response(err, response).into()
}
