/// Row of the `users` table. Never leaves the server: it carries the password hash.
#[derive(Debug, Clone)]
pub struct UserRow {
    pub email: String,
    pub password: String,
}
