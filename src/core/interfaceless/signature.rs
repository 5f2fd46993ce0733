use regex::Regex;

use crate::core::error::SignatureError;
use crate::core::interfaceless::codes::{OutputCode, ParamCode};
use crate::core::interfaceless::wrapper::ContextFn;

/// A compiled code pattern, kept together with its source for diagnostics.
#[derive(Debug, Clone)]
pub struct CodePattern {
    source: String,
    regex: Regex,
}

impl CodePattern {
    pub fn new(pattern: &str) -> Result<Self, SignatureError> {
        let regex = Regex::new(pattern).map_err(|source| SignatureError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_match(&self, code: &str) -> bool {
        self.regex.is_match(code)
    }
}

/// The classified shape of a function: one code per parameter plus one output code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSignature {
    pub inputs: Vec<ParamCode>,
    pub output: OutputCode,
    pub param_types: Vec<&'static str>,
    pub return_type: &'static str,
}

impl FunctionSignature {
    /// Reads the signature of `F` from the codes its parameter and return types carry.
    pub fn of<F, Args>() -> Self
    where
        F: ContextFn<Args>,
    {
        Self {
            inputs: F::input_codes(),
            output: F::output_code(),
            param_types: F::param_types(),
            return_type: F::return_type(),
        }
    }

    /// Input codes as a string, e.g. `"ex"`.
    pub fn input_code(&self) -> String {
        self.inputs.iter().map(ParamCode::as_char).collect()
    }

    pub fn output_code(&self) -> char {
        self.output.as_char()
    }

    /// Checks the codes against the two required patterns.
    pub fn validate(&self, input: &CodePattern, output: &CodePattern) -> Result<(), SignatureError> {
        let input_code = self.input_code();
        if !input.is_match(&input_code) {
            return Err(SignatureError::InputMismatch {
                code: input_code,
                pattern: input.as_str().to_string(),
                params: self.param_types.join(", "),
            });
        }

        let output_code = self.output_code();
        if !output.is_match(&output_code.to_string()) {
            return Err(SignatureError::OutputMismatch {
                code: output_code,
                pattern: output.as_str().to_string(),
                return_type: self.return_type,
            });
        }
        Ok(())
    }
}

/// Classifies `F` and validates it against the given patterns.
pub fn classify<F, Args>(input_pattern: &str, output_pattern: &str) -> Result<FunctionSignature, SignatureError>
where
    F: ContextFn<Args>,
{
    let input = CodePattern::new(input_pattern)?;
    let output = CodePattern::new(output_pattern)?;
    let signature = FunctionSignature::of::<F, Args>();
    signature.validate(&input, &output)?;

    log::debug!(
        "Classified ({}) -> {} as '{}' -> '{}'",
        signature.param_types.join(", "),
        signature.return_type,
        signature.input_code(),
        signature.output_code()
    );
    Ok(signature)
}
