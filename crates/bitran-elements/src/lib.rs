//! Reference element set for bitran.
//!
//! | element | block form | inline form |
//! |---|---|---|
//! | [`code`] | `@code` object block | `` `code` `` |
//! | [`heading`] | `## Title`, `@heading` object block | |
//! | [`bold`] | | `**text**` |
//! | [`dash`] | | ` -- ` |
//!
//! [`transpilers`] registers them in that order. Inline priority follows it,
//! so code spans shield their content from bold and dash.

pub mod bold;
pub mod code;
pub mod dash;
pub mod heading;

use bitran_transpiler::{TranspilerError, Transpilers};

pub fn transpilers() -> Result<Transpilers, TranspilerError> {
    Transpilers::builder()
        .element(code::NAME, code::transpiler())
        .element(heading::NAME, heading::transpiler())
        .element(bold::NAME, bold::transpiler())
        .element(dash::NAME, dash::transpiler())
        .build()
}
