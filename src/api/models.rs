use serde::{de, Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Serialize)]
pub struct ConvertRequest<'a> {
    pub query: &'a str,
}

impl<'a> ConvertRequest<'a> {
    pub fn new(query: &'a str) -> Self {
        Self { query }
    }

    /// Encodes the request as an `application/x-www-form-urlencoded` body.
    pub fn to_form(&self) -> Result<String, serde_urlencoded::ser::Error> {
        serde_urlencoded::to_string(self)
    }
}

/// Raw JSON body returned by the conversion endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ResponseBody {
    #[serde(default)]
    pub output: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConvertResponse {
    Output(String),
    Error(String),
}

impl From<ResponseBody> for ConvertResponse {
    fn from(body: ResponseBody) -> Self {
        // An empty `error` does not count as a reported error.
        match body.error.filter(|error| !error.is_empty()) {
            Some(error) => Self::Error(error),
            None => Self::Output(body.output.unwrap_or_default()),
        }
    }
}

impl ConvertResponse {
    /// Decodes a response body. Only a JSON object is a valid payload.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        match serde_json::from_str::<Value>(raw)? {
            body @ Value::Object(_) => ResponseBody::deserialize(body).map(Self::from),
            _ => Err(<serde_json::Error as de::Error>::custom(
                "response body is not a JSON object",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_reserved_characters() {
        let body = ConvertRequest::new("2 + 2").to_form().unwrap();
        assert_eq!(body, "query=2+%2B+2");

        let body = ConvertRequest::new("int *p[3]; a&b=c").to_form().unwrap();
        assert_eq!(body, "query=int+*p%5B3%5D%3B+a%26b%3Dc");
    }

    #[test]
    fn encodes_empty_query() {
        assert_eq!(ConvertRequest::new("").to_form().unwrap(), "query=");
    }

    #[test]
    fn error_field_wins_over_output() {
        let parsed = ConvertResponse::from_json(r#"{"output":"x","error":"bad input"}"#).unwrap();
        assert_eq!(parsed, ConvertResponse::Error("bad input".to_string()));
    }

    #[test]
    fn empty_error_falls_through_to_output() {
        let parsed = ConvertResponse::from_json(r#"{"output":"4","error":""}"#).unwrap();
        assert_eq!(parsed, ConvertResponse::Output("4".to_string()));
    }

    #[test]
    fn missing_fields_render_empty_output() {
        let parsed = ConvertResponse::from_json("{}").unwrap();
        assert_eq!(parsed, ConvertResponse::Output(String::new()));
    }

    #[test]
    fn rejects_non_json_and_non_string_fields() {
        assert!(ConvertResponse::from_json("<html>oops</html>").is_err());
        assert!(ConvertResponse::from_json(r#"{"output":4}"#).is_err());
    }

    #[test]
    fn rejects_bodies_that_are_not_objects() {
        assert!(ConvertResponse::from_json("[]").is_err());
        assert!(ConvertResponse::from_json(r#"["x","err"]"#).is_err());
        assert!(ConvertResponse::from_json(r#""4""#).is_err());
        assert!(ConvertResponse::from_json("null").is_err());
    }
}
