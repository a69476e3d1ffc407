use anyhow::{bail, Result};
use clap::Args;
use shopline_portal_lib::hash_password;

#[derive(Args)]
pub struct HashPasswordArgs {
    /// Staff password to hash
    pub password: String,

    /// Username to prefix, printing a ready-made `user:digest` entry
    #[arg(long)]
    pub username: Option<String>,
}

pub fn run(args: &HashPasswordArgs) -> Result<()> {
    if args.password.is_empty() {
        bail!("password must not be empty");
    }
    println!("{}", staff_entry(args.username.as_deref(), &args.password));
    Ok(())
}

fn staff_entry(username: Option<&str>, password: &str) -> String {
    let digest = hash_password(password);
    match username {
        Some(user) => format!("{}:{}", user.trim(), digest),
        None => digest,
    }
}
