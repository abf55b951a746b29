/// A stored complaint as shown to administrators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Complaint {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub location: String,
    pub message: String,
    /// Path of the stored attachment, relative to the server's working directory.
    pub attachment_path: Option<String>,
    pub created_at: String,
}

impl Complaint {
    /// File name component of the attachment, used to build its public URL.
    pub fn attachment_name(&self) -> Option<&str> {
        let path = self.attachment_path.as_deref()?;
        path.rsplit(['/', '\\']).next().filter(|s| !s.is_empty())
    }
}
