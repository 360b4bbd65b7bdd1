pub type MorphixResult<T> = Result<T, MorphixError>;

#[derive(thiserror::Error, Debug)]
pub enum MorphixError {
    #[error("decode error: {0}")]
    Decode(String),

    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("encode error: {0}")]
    Encode(String),

    #[error("display error: {0}")]
    Display(String),

    #[error("serialization error: {0}")]
    Serde(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MorphixError {
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn dimension_mismatch(msg: impl Into<String>) -> Self {
        Self::DimensionMismatch(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    pub fn display(msg: impl Into<String>) -> Self {
        Self::Display(msg.into())
    }

    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            MorphixError::decode("x")
                .to_string()
                .contains("decode error:")
        );
        assert!(
            MorphixError::dimension_mismatch("x")
                .to_string()
                .contains("dimension mismatch:")
        );
        assert!(
            MorphixError::validation("x")
                .to_string()
                .contains("validation error:")
        );
        assert!(
            MorphixError::encode("x")
                .to_string()
                .contains("encode error:")
        );
        assert!(
            MorphixError::display("x")
                .to_string()
                .contains("display error:")
        );
        assert!(MorphixError::serde("x").to_string().contains("serialization error:"));
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = MorphixError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }
}
