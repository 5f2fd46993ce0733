use std::any::type_name;
use std::marker::PhantomData;

use crate::core::dataframe::DataFrame;
use crate::core::error::{CreatorResult, SignatureError};
use crate::core::interfaceless::codes::{CallInput, FunctionArg, FunctionOutput, OutputCode, ParamCode};
use crate::core::interfaceless::signature::{classify, FunctionSignature};
use crate::core::schema::Schema;

/// A plain function whose parameters and return type all carry codes.
///
/// Implemented for every `Fn` of up to eight [`FunctionArg`] parameters
/// returning a [`FunctionOutput`]; `Args` is the parameter tuple.
pub trait ContextFn<Args>: Clone + Send + Sync + 'static {
    type Output: FunctionOutput;

    fn input_codes() -> Vec<ParamCode>;

    fn param_types() -> Vec<&'static str>;

    fn output_code() -> OutputCode {
        <Self::Output as FunctionOutput>::CODE
    }

    fn return_type() -> &'static str {
        type_name::<Self::Output>()
    }

    /// Calls the function with an explicit argument tuple.
    fn invoke(&self, args: Args) -> Self::Output;

    /// Extracts every argument from `input`, in declaration order, and calls the function.
    fn invoke_with(&self, input: &mut CallInput) -> CreatorResult<Self::Output>;
}

macro_rules! impl_context_fn {
    ($($ty:ident),*) => {
        #[allow(non_snake_case, unused_variables, unused_mut)]
        impl<Func, Out, $($ty,)*> ContextFn<($($ty,)*)> for Func
        where
            Func: Fn($($ty),*) -> Out + Clone + Send + Sync + 'static,
            Out: FunctionOutput,
            $($ty: FunctionArg,)*
        {
            type Output = Out;

            fn input_codes() -> Vec<ParamCode> {
                vec![$(<$ty as FunctionArg>::CODE),*]
            }

            fn param_types() -> Vec<&'static str> {
                vec![$(type_name::<$ty>()),*]
            }

            fn invoke(&self, ($($ty,)*): ($($ty,)*)) -> Out {
                (self)($($ty),*)
            }

            fn invoke_with(&self, input: &mut CallInput) -> CreatorResult<Out> {
                $(let $ty = <$ty as FunctionArg>::extract(input)?;)*
                Ok((self)($($ty),*))
            }
        }
    };
}

impl_context_fn!();
impl_context_fn!(A1);
impl_context_fn!(A1, A2);
impl_context_fn!(A1, A2, A3);
impl_context_fn!(A1, A2, A3, A4);
impl_context_fn!(A1, A2, A3, A4, A5);
impl_context_fn!(A1, A2, A3, A4, A5, A6);
impl_context_fn!(A1, A2, A3, A4, A5, A6, A7);
impl_context_fn!(A1, A2, A3, A4, A5, A6, A7, A8);

/// Owns a function together with its validated signature.
pub struct FunctionWrapper<F, Args> {
    func: F,
    signature: FunctionSignature,
    _args: PhantomData<fn(Args)>,
}

impl<F: Clone, Args> Clone for FunctionWrapper<F, Args> {
    fn clone(&self) -> Self {
        Self {
            func: self.func.clone(),
            signature: self.signature.clone(),
            _args: PhantomData,
        }
    }
}

impl<F, Args> std::fmt::Debug for FunctionWrapper<F, Args> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionWrapper")
            .field("func", &type_name::<F>())
            .field("signature", &self.signature)
            .finish()
    }
}

impl<F, Args> FunctionWrapper<F, Args>
where
    F: ContextFn<Args>,
{
    /// Wraps `func`, failing if its codes don't match the two patterns.
    pub fn new(func: F, input_pattern: &str, output_pattern: &str) -> Result<Self, SignatureError> {
        let signature = classify::<F, Args>(input_pattern, output_pattern)?;
        Ok(Self {
            func,
            signature,
            _args: PhantomData,
        })
    }

    pub fn signature(&self) -> &FunctionSignature {
        &self.signature
    }

    pub fn input_code(&self) -> String {
        self.signature.input_code()
    }

    pub fn output_code(&self) -> char {
        self.signature.output_code()
    }

    pub fn return_type(&self) -> &'static str {
        self.signature.return_type
    }

    pub fn func(&self) -> &F {
        &self.func
    }

    /// Calls the function with arguments drawn from `input` and converts the result.
    pub fn run(&self, mut input: CallInput, output_schema: Option<&Schema>) -> CreatorResult<Box<dyn DataFrame>> {
        self.func.invoke_with(&mut input)?.into_dataframe(output_schema)
    }

    /// Calls the function directly and returns its raw output.
    pub fn call(&self, args: Args) -> F::Output {
        self.func.invoke(args)
    }
}
