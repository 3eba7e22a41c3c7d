pub mod descriptions;
pub mod markup;
pub mod render;

pub use descriptions::{
    DescriptionMap, DescriptionsError, ALG_CREATOR, ALG_DESC, ALG_HELP_CREATOR,
};
pub use markup::{html_from_markup_file, MarkupRules};
pub use render::{html_from_help_file, render_help, AlgorithmDescriptor, HelpField};
