pub mod boss;
pub mod collision;
pub mod entity;
pub mod kinematics;
