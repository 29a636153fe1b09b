pub mod chess;
pub mod loading;

pub use chess::ChessView;
pub use loading::LoadingView;
