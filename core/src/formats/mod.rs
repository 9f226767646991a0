pub mod h5;
