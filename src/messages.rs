//! User-facing strings (zh-CN).

pub const NETWORK_ERROR: &str = "网络连接错误，请检查网络连接";
pub const SERVER_ERROR: &str = "服务器错误，请稍后重试";
pub const NOT_FOUND: &str = "请求的资源不存在";
pub const UNAUTHORIZED: &str = "未授权操作，请重新登录";
pub const UNKNOWN: &str = "发生未知错误，请稍后重试";
pub const TIMEOUT: &str = "请求超时，请稍后重试";
pub const GENERAL: &str = "操作失败，请稍后重试";

pub const REQUIRED_USERNAME: &str = "请输入用户名";
pub const REQUIRED_EMAIL: &str = "请输入邮箱";
pub const REQUIRED_PASSWORD: &str = "请输入密码";
pub const REQUIRED_CURRENT_PASSWORD: &str = "请输入当前密码";
pub const REQUIRED_NEW_PASSWORD: &str = "请输入新密码";
pub const REQUIRED_CONFIRM_PASSWORD: &str = "请确认密码";
pub const EMAIL_FORMAT: &str = "邮箱格式不正确";
pub const PASSWORD_TOO_SHORT: &str = "密码长度至少为8位";
pub const PASSWORD_MISMATCH: &str = "两次输入的密码不一致";

pub const LOGIN_FAILED: &str = "邮箱或密码错误，请重试";
pub const ACCOUNT_DEACTIVATED: &str = "账户已被禁用，请联系管理员";
pub const EMAIL_EXISTS: &str = "该邮箱已被注册";
pub const USERNAME_TAKEN: &str = "该用户名已被使用";
pub const REGISTER_FAILED: &str = "注册失败，请稍后重试";
pub const WRONG_PASSWORD: &str = "当前密码不正确";
pub const CHANGE_PASSWORD_FAILED: &str = "修改密码失败，请稍后重试";
pub const INVALID_RESET_LINK: &str = "无效的重置密码链接，请重新发起找回密码请求";
pub const RESET_FAILED: &str = "重置密码失败，可能是链接已过期，请重新发起找回密码请求";
pub const FORGOT_PASSWORD_FAILED: &str = "发送重置密码邮件失败，请检查邮箱是否正确，或稍后重试";
pub const VERIFY_FAILED: &str = "验证邮箱失败，请重新尝试";
pub const MISSING_VERIFY_TOKEN: &str = "缺少验证令牌";
pub const RESEND_FAILED: &str = "发送验证邮件失败，请稍后重试";
pub const PROFILE_UPDATE_FAILED: &str = "更新个人信息失败，请稍后重试";
pub const LOAD_USER_FAILED: &str = "加载用户数据失败，请重试";
pub const NOTE_NOT_FOUND: &str = "笔记不存在";

pub const LOGIN_SUCCESS: &str = "登录成功";
pub const LOGOUT_SUCCESS: &str = "注销成功";
pub const REGISTER_SUCCESS: &str = "注册成功！请查收邮箱激活账户";
pub const RESET_EMAIL_SENT: &str = "重置密码邮件已发送，请检查您的邮箱！";
pub const RESET_SUCCESS: &str = "密码重置成功！即将跳转到登录页面";
pub const VERIFICATION_SENT: &str = "验证邮件已发送，请查收您的邮箱！";
pub const VERIFY_SUCCESS: &str = "邮箱验证成功！您现在可以登录了。";
pub const PROFILE_UPDATED: &str = "个人信息更新成功！";
pub const PASSWORD_CHANGED: &str = "密码修改成功！";
pub const USER_STATUS_FAILED: &str = "更新用户状态失败，请重试";
pub const USER_ROLE_FAILED: &str = "更新用户角色失败，请重试";
pub const USER_NOT_FOUND: &str = "用户不存在或已被删除";
pub const VERIFY_LINK_INVALID: &str = "无效的验证链接。请检查您的邮件或请求新的验证链接。";
pub const VERIFY_LINK_EXPIRED: &str = "验证失败。链接可能已过期或无效。";
