//! Initial document for a trace explorer webview.
//!
//! The trace server origins are baked into the content security policy, so
//! the document must be rendered again whenever the endpoint changes.

use uuid::Uuid;

use crate::config::TraceServerConfig;

/// Fresh script nonce, 32 characters.
pub fn nonce() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Render the document loading `script` from the bundled `pack/` directory.
pub fn webview_html(script: &str, server: &TraceServerConfig, nonce: &str) -> String {
    let connect_src = server.connect_sources().join(" ");
    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width,initial-scale=1,shrink-to-fit=no">
    <meta name="theme-color" content="#000000">
    <title>Trace Explorer</title>
    <meta http-equiv="Content-Security-Policy"
        content="default-src 'none';
        img-src 'self';
        script-src 'nonce-{nonce}' 'unsafe-eval';
        style-src 'self' 'unsafe-inline';
        connect-src {connect_src};
        font-src 'self'">
    <link href="lib/codicons/codicon.css" rel="stylesheet" />
    <base href="pack/">
</head>

<body>
    <noscript>You need to enable JavaScript to run this app.</noscript>
    <div id="root"></div>

    <script nonce="{nonce}" src="{script}"></script>
</body>
</html>"##
    )
}
