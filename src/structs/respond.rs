use serde::{Deserialize, Serialize};

// 出错时返回给客户端的响应体
#[derive(Serialize, Deserialize, Debug)]
pub struct Respond {
    pub code: u16,
    pub msg: String,
}
