use anyhow::{Context, Result};
use cdnapi::{Session, params};

fn main() -> Result<()> {
    // Example program that calls the library API.
    // Configure credentials via FASTLY_USER / FASTLY_PASSWORD or a `.fastlyrc` file.
    let session = Session::from_env().context("login failed")?;

    let service = session
        .services()
        .create(&params(&[("name", "cdnapi-demo"), ("comment", "created by demo")]))?;
    println!("created service {} ({})", service.name, service.id);

    let version = session.versions(&service.id).create(&params(&[]))?;
    let domains = session.domains(&version.reference());
    domains.create(&params(&[("name", "demo.example.com")]))?;

    session.backends(&version.reference()).create(&params(&[
        ("name", "origin"),
        ("address", "origin.example.com"),
        ("port", "443"),
        ("use_ssl", "true"),
    ]))?;

    for check in domains.check_all()? {
        println!(
            "{} -> {} (proper: {})",
            check.domain.name, check.cname, check.is_proper
        );
    }

    session.services().delete(&service.id)?;
    println!("deleted service {}", service.id);
    Ok(())
}
