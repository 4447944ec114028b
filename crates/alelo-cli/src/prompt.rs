use std::io::{self, Write};

use alelo_core::auth::CredentialReader;

/// Reads the CPF from stdin and the password without echo.
pub struct TerminalCredentials;

impl CredentialReader for TerminalCredentials {
    fn read_identifier(&mut self) -> io::Result<String> {
        // Only called once the flow has found the stored session empty
        println!("[!] Session is not created, creating a new one...");
        print!("[+] Profile CPF (just digits): ");
        io::stdout().flush()?;

        let mut cpf = String::new();
        if io::stdin().read_line(&mut cpf)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "no CPF entered"));
        }
        Ok(cpf.trim().to_string())
    }

    fn read_secret(&mut self) -> io::Result<String> {
        rpassword::prompt_password("[+] Password: ")
    }
}
