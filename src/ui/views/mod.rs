mod movie_browser;

pub use movie_browser::MovieBrowserView;
