use cirrus_derive::sdk_model;

#[sdk_model(shape = "Vault")]
pub struct Vault {
    vault_name: Option<String>,
    size_in_bytes: Option<i64>,
    tags: Option<Vec<String>>,
}

#[sdk_model(rename_all = "camelCase", display = false)]
pub struct Archive {
    archive_id: String,
    #[model(name = "desc")]
    description: Option<String>,
}

fn main() {
    let vault = Vault::default().with_vault_name("photos").with_tags(["a"]);
    assert_eq!(vault.vault_name(), Some("photos"));
    assert_eq!(vault.tags()[..], ["a"]);

    let archive = Archive { archive_id: "id".to_owned(), description: None };
    assert_eq!(archive.archive_id(), "id");
}
