pub mod balance;
pub mod free_space_packer;
pub mod layer_packer;
pub mod packer;
pub mod shelf_packer;
