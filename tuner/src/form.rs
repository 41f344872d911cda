use crate::error::TunerError;
use crate::memory::MemorySize;
use serde::{Deserialize, Serialize};

/// Field values as typed by the user. Credentials are never persisted.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Form {
    pub function: String,
    #[serde(skip)]
    pub access_key: String,
    #[serde(skip)]
    pub secret_key: String,
    pub region: String,
    pub memories: Vec<MemorySize>,
}

impl Default for Form {
    fn default() -> Self {
        Self {
            function: String::new(),
            access_key: String::new(),
            secret_key: String::new(),
            region: String::new(),
            memories: MemorySize::DEFAULT_SELECTION.to_vec(),
        }
    }
}

#[derive(Clone)]
pub struct Credentials {
    access_key: String,
    secret_key: String,
}

impl Credentials {
    pub fn access_key(&self) -> &str {
        &self.access_key
    }

    pub fn secret_key(&self) -> &str {
        &self.secret_key
    }
}

/// A submission that passed validation. Only [`Form::validate`] creates one, so
/// nothing reaches the network without it.
#[derive(Clone)]
pub struct Request {
    function: String,
    credentials: Credentials,
    region: String,
    memories: Vec<MemorySize>,
}

impl Request {
    pub fn function(&self) -> &str {
        &self.function
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    /// Selected sizes in selection order, without duplicates.
    pub fn memories(&self) -> &[MemorySize] {
        &self.memories
    }
}

impl Form {
    /// Selects `memory` if it isn't selected yet, otherwise removes it.
    pub fn toggle(&mut self, memory: MemorySize) {
        match self.memories.iter().position(|&selected| selected == memory) {
            Some(index) => {
                self.memories.remove(index);
            }
            None => self.memories.push(memory),
        }
    }

    pub fn validate(&self) -> Result<Request, TunerError> {
        let fields = [
            ("Lambda Function ARN", &self.function),
            ("AWS Access Key", &self.access_key),
            ("AWS Secret Key", &self.secret_key),
            ("AWS Region", &self.region),
        ];

        let mut missing: Vec<&'static str> = fields
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| *name)
            .collect();

        if self.memories.is_empty() {
            missing.push("Memory configurations");
        }

        if !missing.is_empty() {
            return Err(TunerError::Incomplete { missing });
        }

        let mut memories = Vec::with_capacity(self.memories.len());
        for &memory in &self.memories {
            if !memories.contains(&memory) {
                memories.push(memory);
            }
        }

        Ok(Request {
            function: self.function.trim().to_string(),
            credentials: Credentials {
                access_key: self.access_key.trim().to_string(),
                secret_key: self.secret_key.trim().to_string(),
            },
            region: self.region.trim().to_string(),
            memories,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> Form {
        Form {
            function: "arn:aws:lambda:us-east-1:123456789012:function:resize-images".to_string(),
            access_key: "AKIAEXAMPLE".to_string(),
            secret_key: "secret".to_string(),
            region: "us-east-1".to_string(),
            ..Default::default()
        }
    }

    fn missing(form: &Form) -> Vec<&'static str> {
        match form.validate() {
            Err(TunerError::Incomplete { missing }) => missing,
            Err(err) => panic!("unexpected error: {err}"),
            Ok(_) => panic!("form should not validate"),
        }
    }

    #[test]
    fn default_form_selects_default_memories() {
        assert_eq!(Form::default().memories, MemorySize::DEFAULT_SELECTION.to_vec());
    }

    #[test]
    fn filled_form_validates() {
        let request = filled().validate().unwrap();

        assert_eq!(request.region(), "us-east-1");
        assert_eq!(request.credentials().access_key(), "AKIAEXAMPLE");
        assert_eq!(request.memories(), MemorySize::DEFAULT_SELECTION.as_slice());
    }

    #[test]
    fn each_blank_field_is_reported() {
        let mut form = filled();
        form.function.clear();
        assert_eq!(missing(&form), vec!["Lambda Function ARN"]);

        let mut form = filled();
        form.access_key.clear();
        assert_eq!(missing(&form), vec!["AWS Access Key"]);

        let mut form = filled();
        form.secret_key = "   ".to_string();
        assert_eq!(missing(&form), vec!["AWS Secret Key"]);

        let mut form = filled();
        form.region.clear();
        form.memories.clear();
        assert_eq!(missing(&form), vec!["AWS Region", "Memory configurations"]);
    }

    #[test]
    fn validation_message_matches_form_text() {
        let err = Form::default().validate().err().unwrap();
        assert_eq!(
            err.to_string(),
            "Please fill in all fields and select at least one memory configuration."
        );
    }

    #[test]
    fn duplicates_keep_first_position() {
        let mut form = filled();
        form.memories = [1024, 128, 1024, 512, 128]
            .into_iter()
            .map(|mb| MemorySize::try_from(mb).unwrap())
            .collect();

        let request = form.validate().unwrap();
        let mbs: Vec<u16> = request.memories().iter().map(|m| m.mb()).collect();
        assert_eq!(mbs, vec![1024, 128, 512]);
    }

    #[test]
    fn toggle_preserves_selection_order() {
        let mut form = Form {
            memories: Vec::new(),
            ..Default::default()
        };
        let large = MemorySize::try_from(4096).unwrap();
        let small = MemorySize::try_from(256).unwrap();

        form.toggle(large);
        form.toggle(small);
        assert_eq!(form.memories, vec![large, small]);

        form.toggle(large);
        assert_eq!(form.memories, vec![small]);
    }
}
