//! Positional parameter encoding.

/// Encode arguments into the positional `params` of a request.
///
/// Each argument is encoded with the default codecs, so strings travel
/// as-is and everything else as JSON. Evaluates to
/// `Result<Vec<Option<String>>, RemoteError>`.
#[macro_export]
macro_rules! params {
    () => {
        ::std::result::Result::<
            ::std::vec::Vec<::std::option::Option<::std::string::String>>,
            $crate::RemoteError,
        >::Ok(::std::vec::Vec::new())
    };
    ($($value:expr),+ $(,)?) => {
        (|| -> ::std::result::Result<
            ::std::vec::Vec<::std::option::Option<::std::string::String>>,
            $crate::RemoteError,
        > {
            ::std::result::Result::Ok(::std::vec![$($crate::encode_param(&$value)?),+])
        })()
    };
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    #[test]
    fn test_empty() {
        let params = params![].unwrap();
        assert!(params.is_empty());
    }

    #[test]
    fn test_mixed_arguments() {
        let name = "ada".to_string();
        let missing: Option<String> = None;
        let params = params![3, name, missing, vec![1, 2]].unwrap();
        assert_eq!(
            params,
            vec![
                Some("3".to_string()),
                Some("ada".to_string()),
                None,
                Some("[1,2]".to_string()),
            ]
        );
    }

    #[test]
    fn test_map_argument() {
        let map = HashMap::from([("k".to_string(), 1)]);
        let params = params![map].unwrap();
        assert_eq!(params[0].as_deref(), Some(r#"{"k":1}"#));
    }
}
