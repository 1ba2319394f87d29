//! Result presentation
//!
//! Pagination of the filtered set and pure rendering of records into a view
//! description that front ends draw.

mod pagination;
mod render;

pub use pagination::{LoadMore, Paginator, PAGE_SIZE};
pub use render::{
    escape_html, format_date, group_thousands, literal_text, render, render_card, CardLink,
    RenderOptions, ResultCard, ResultsBody, ResultsView, DEFAULT_DATE_FORMAT, INVALID_DATE,
    LINK_LABEL, NO_DESCRIPTION, NO_RESULTS,
};
