// 認証モジュール

/// パスワードハッシュ化・検証（bcrypt）
pub mod password;

/// JWT生成・検証（jsonwebtoken）
pub mod jwt;

/// セッションゲート（ログイン・セッション検証・ログアウト）
pub mod session;

/// 認証ミドルウェア（セッション, CSRF）
pub mod middleware;

/// 初回起動時の管理者アカウント作成
pub mod bootstrap;

/// セッションJWT Cookie名
pub const SESSION_COOKIE: &str = "dalog_session";
/// CSRF Cookie名
pub const CSRF_COOKIE: &str = "dalog_csrf";
/// CSRFヘッダー名
pub const CSRF_HEADER: &str = "x-csrf-token";

/// セッションCookieヘッダーを生成
pub fn build_session_cookie(token: &str, max_age_secs: usize, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE, token, max_age_secs
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// CSRF Cookieヘッダーを生成（フロントで読み取るためHttpOnlyは付与しない）
pub fn build_csrf_cookie(token: &str, max_age_secs: usize, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; Path=/; SameSite=Lax; Max-Age={}",
        CSRF_COOKIE, token, max_age_secs
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// セッションCookieを削除するためのヘッダーを生成
pub fn clear_session_cookie(secure: bool) -> String {
    let mut cookie = format!(
        "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0; Expires=Thu, 01 Jan 1970 00:00:00 GMT",
        SESSION_COOKIE
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// CSRF Cookieを削除するためのヘッダーを生成
pub fn clear_csrf_cookie(secure: bool) -> String {
    let mut cookie = format!(
        "{}=; Path=/; SameSite=Lax; Max-Age=0; Expires=Thu, 01 Jan 1970 00:00:00 GMT",
        CSRF_COOKIE
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// ランダムトークン生成
pub fn generate_random_token(length: usize) -> String {
    use rand::RngExt;
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::rng();
    (0..length)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}
