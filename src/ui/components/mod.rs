mod genre_bar;
mod input;
mod key_result;
mod movie_detail;
mod search_input;

pub use genre_bar::GenreBar;
pub use key_result::KeyResult;
pub use movie_detail::render_movie_detail;
pub use search_input::{SearchEvent, SearchInput};
