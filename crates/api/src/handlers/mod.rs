pub mod avaliacao;
pub mod curso;
