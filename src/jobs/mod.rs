pub mod share_apply;
