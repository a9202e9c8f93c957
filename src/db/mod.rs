pub mod dbcode;
