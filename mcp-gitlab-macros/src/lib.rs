//! Procedural macros for mcp-gitlab
//!
//! This crate provides the `#[gitlab_tool]` attribute macro that turns a plain
//! argument struct into a registrable MCP tool.

use darling::{FromMeta, ast::NestedMeta};
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{DeriveInput, parse_macro_input};

/// Arguments for the `#[gitlab_tool]` attribute
#[derive(Debug, FromMeta)]
struct GitLabToolArgs {
    /// Tool name as exposed over MCP (e.g., "get-my-merge-requests")
    name: String,
    /// Human-readable title
    title: String,
    /// Tool description for MCP
    description: String,
}

/// Attribute macro for GitLab MCP tools.
///
/// This macro generates:
/// - `ToolInfo` trait implementation (name, title, description)
/// - `#[derive(Debug, Clone, serde::Deserialize, schemars::JsonSchema)]` on the struct,
///   so field doc comments become the input schema descriptions
///
/// # Example
///
/// ```ignore
/// #[gitlab_tool(
///     name = "create-issue",
///     title = "Create Issue",
///     description = "Create a new issue in a GitLab project"
/// )]
/// pub struct CreateIssue {
///     /// Project ID or URL-encoded path
///     pub project_id: String,
///     /// Issue title
///     pub title: String,
/// }
///
/// #[async_trait]
/// impl ToolExecutor for CreateIssue {
///     async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
///         // Your implementation here
///     }
/// }
/// ```
#[proc_macro_attribute]
pub fn gitlab_tool(attr: TokenStream, item: TokenStream) -> TokenStream {
    let attr_args = match NestedMeta::parse_meta_list(attr.into()) {
        Ok(v) => v,
        Err(e) => return TokenStream::from(e.to_compile_error()),
    };

    let args = match GitLabToolArgs::from_list(&attr_args) {
        Ok(v) => v,
        Err(e) => return TokenStream::from(e.write_errors()),
    };

    let input = parse_macro_input!(item as DeriveInput);
    let expanded = impl_gitlab_tool(&args, &input);

    TokenStream::from(expanded)
}

/// Tool names are kebab-case: lowercase ASCII letters, digits and single dashes
fn is_valid_tool_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('-')
        && !name.ends_with('-')
        && !name.contains("--")
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

fn impl_gitlab_tool(args: &GitLabToolArgs, input: &DeriveInput) -> TokenStream2 {
    let struct_name = &input.ident;
    let tool_name = &args.name;
    let title = &args.title;
    let description = &args.description;

    if !is_valid_tool_name(tool_name) {
        return syn::Error::new_spanned(
            input,
            format!(
                "Invalid tool name '{}': use lowercase kebab-case (e.g. get-current-user)",
                tool_name
            ),
        )
        .to_compile_error();
    }

    if description.trim().is_empty() {
        return syn::Error::new_spanned(input, "gitlab_tool requires a non-empty description")
            .to_compile_error();
    }

    let vis = &input.vis;
    let attrs: Vec<_> = input.attrs.iter().collect();
    let generics = &input.generics;

    // Unit-like tools (`struct GetProjects {}`) are allowed; tuple structs are not
    let fields = match &input.data {
        syn::Data::Struct(data) => match &data.fields {
            syn::Fields::Named(fields) => &fields.named,
            _ => {
                return syn::Error::new_spanned(
                    input,
                    "gitlab_tool only supports structs with named fields",
                )
                .to_compile_error();
            }
        },
        _ => {
            return syn::Error::new_spanned(input, "gitlab_tool only supports structs")
                .to_compile_error();
        }
    };

    quote! {
        #(#attrs)*
        #[derive(Debug, Clone, serde::Deserialize, schemars::JsonSchema)]
        #vis struct #struct_name #generics {
            #fields
        }

        impl crate::tools::ToolInfo for #struct_name {
            fn name() -> &'static str {
                #tool_name
            }

            fn title() -> &'static str {
                #title
            }

            fn description() -> &'static str {
                #description
            }
        }
    }
}
