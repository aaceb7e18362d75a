use proc_macro::TokenStream;

mod body;
mod choices;

#[proc_macro_derive(CommandBody, attributes(option))]
pub fn command_body_derive(input: TokenStream) -> TokenStream {
    body::derive(input)
}

#[proc_macro_derive(Choices, attributes(choice))]
pub fn enum_choices_derive(input: TokenStream) -> TokenStream {
    choices::derive(input)
}
