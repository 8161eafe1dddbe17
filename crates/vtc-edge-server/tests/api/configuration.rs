use vtc_edge_server::get_configuration;

#[test]
fn navigation_defaults_are_loaded_from_base_file() {
    // Act
    let configuration = get_configuration().unwrap();

    // Assert
    insta::assert_json_snapshot!(configuration.navigation, @r###"
    {
      "login_path": "/login",
      "redirect_param": "redirect",
      "cookie_name": "auth_token",
      "public_prefixes": [
        "/login",
        "/forgot-password"
      ],
      "protected_prefixes": [
        "/",
        "/drivers",
        "/partners",
        "/evaluations",
        "/agents",
        "/admin",
        "/settings",
        "/reporting",
        "/notifications",
        "/import-export",
        "/audit"
      ],
      "unlisted": "allow"
    }
    "###);
}

#[test]
fn local_environment_binds_to_loopback() {
    let configuration = get_configuration().unwrap();
    assert_eq!(configuration.application.host, "127.0.0.1");
    assert_eq!(configuration.application.port, 8080);
}
