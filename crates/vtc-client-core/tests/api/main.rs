mod helpers;
mod login;
mod logout;
mod password;
mod resources;
mod restore;
