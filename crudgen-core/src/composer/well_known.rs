//! External types referenced by generated artifacts.
//!
//! These belong to the host framework stack and are never generated here;
//! artifacts only mention them by qualified name.

use crate::ir::TypeReference;

fn ty(namespace: &str, name: &str) -> TypeReference {
    TypeReference::simple(namespace, name)
}

const SPRING_WEB: &str = "org.springframework.web.bind.annotation";
const MYBATIS_TYPE: &str = "org.apache.ibatis.type";
const JACKSON_DATABIND: &str = "com.fasterxml.jackson.databind";

// java.lang / java.util

pub fn string() -> TypeReference {
    ty("java.lang", "String")
}

pub fn integer() -> TypeReference {
    ty("java.lang", "Integer")
}

pub fn class() -> TypeReference {
    ty("java.lang", "Class")
}

pub fn override_() -> TypeReference {
    ty("java.lang", "Override")
}

pub fn arrays() -> TypeReference {
    ty("java.util", "Arrays")
}

pub fn list() -> TypeReference {
    ty("java.util", "List")
}

/// Unbounded wildcard type argument.
pub fn wildcard() -> TypeReference {
    ty("", "?")
}

// Controller stack

pub fn base_controller(entity: TypeReference, repository: TypeReference) -> TypeReference {
    TypeReference::generic(
        "org.jeecg.common.system.base.controller",
        "JeecgController",
        vec![entity, repository],
    )
}

pub fn result(inner: TypeReference) -> TypeReference {
    TypeReference::generic("org.jeecg.common.api.vo", "Result", vec![inner])
}

pub fn result_raw() -> TypeReference {
    ty("org.jeecg.common.api.vo", "Result")
}

pub fn auto_log() -> TypeReference {
    ty("org.jeecg.common.aspect.annotation", "AutoLog")
}

pub fn query_generator() -> TypeReference {
    ty("org.jeecg.common.system.query", "QueryGenerator")
}

pub fn tag() -> TypeReference {
    ty("io.swagger.v3.oas.annotations.tags", "Tag")
}

pub fn operation() -> TypeReference {
    ty("io.swagger.v3.oas.annotations", "Operation")
}

pub fn rest_controller() -> TypeReference {
    ty(SPRING_WEB, "RestController")
}

pub fn request_mapping() -> TypeReference {
    ty(SPRING_WEB, "RequestMapping")
}

pub fn request_method() -> TypeReference {
    ty(SPRING_WEB, "RequestMethod")
}

pub fn get_mapping() -> TypeReference {
    ty(SPRING_WEB, "GetMapping")
}

pub fn post_mapping() -> TypeReference {
    ty(SPRING_WEB, "PostMapping")
}

pub fn delete_mapping() -> TypeReference {
    ty(SPRING_WEB, "DeleteMapping")
}

pub fn request_param() -> TypeReference {
    ty(SPRING_WEB, "RequestParam")
}

pub fn request_body() -> TypeReference {
    ty(SPRING_WEB, "RequestBody")
}

pub fn model_and_view() -> TypeReference {
    ty("org.springframework.web.servlet", "ModelAndView")
}

pub fn http_request() -> TypeReference {
    ty("jakarta.servlet.http", "HttpServletRequest")
}

pub fn http_response() -> TypeReference {
    ty("jakarta.servlet.http", "HttpServletResponse")
}

pub fn logger() -> TypeReference {
    ty("org.slf4j", "Logger")
}

pub fn logger_factory() -> TypeReference {
    ty("org.slf4j", "LoggerFactory")
}

pub fn required_args_constructor() -> TypeReference {
    ty("lombok", "RequiredArgsConstructor")
}

pub fn sneaky_throws() -> TypeReference {
    ty("lombok", "SneakyThrows")
}

// Persistence stack

pub fn query_wrapper(entity: TypeReference) -> TypeReference {
    TypeReference::generic(
        "com.baomidou.mybatisplus.core.conditions.query",
        "QueryWrapper",
        vec![entity],
    )
}

pub fn page(entity: TypeReference) -> TypeReference {
    TypeReference::generic(
        "com.baomidou.mybatisplus.extension.plugins.pagination",
        "Page",
        vec![entity],
    )
}

pub fn ipage(entity: TypeReference) -> TypeReference {
    TypeReference::generic("com.baomidou.mybatisplus.core.metadata", "IPage", vec![entity])
}

pub fn base_mapper(entity: TypeReference) -> TypeReference {
    TypeReference::generic("com.baomidou.mybatisplus.core.mapper", "BaseMapper", vec![entity])
}

pub fn service_impl(mapper: TypeReference, entity: TypeReference) -> TypeReference {
    TypeReference::generic(
        "com.baomidou.mybatisplus.extension.service.impl",
        "ServiceImpl",
        vec![mapper, entity],
    )
}

pub fn mapper_annotation() -> TypeReference {
    ty("org.apache.ibatis.annotations", "Mapper")
}

pub fn service_annotation() -> TypeReference {
    ty("org.springframework.stereotype", "Service")
}

pub fn abstract_json_type_handler(handled: TypeReference) -> TypeReference {
    TypeReference::generic(
        "com.baomidou.mybatisplus.extension.handlers",
        "AbstractJsonTypeHandler",
        vec![handled],
    )
}

pub fn mapped_types() -> TypeReference {
    ty(MYBATIS_TYPE, "MappedTypes")
}

pub fn mapped_jdbc_types() -> TypeReference {
    ty(MYBATIS_TYPE, "MappedJdbcTypes")
}

pub fn jdbc_type() -> TypeReference {
    ty(MYBATIS_TYPE, "JdbcType")
}

// JSON codec

pub fn object_mapper() -> TypeReference {
    ty(JACKSON_DATABIND, "ObjectMapper")
}

pub fn serialization_feature() -> TypeReference {
    ty(JACKSON_DATABIND, "SerializationFeature")
}

pub fn deserialization_feature() -> TypeReference {
    ty(JACKSON_DATABIND, "DeserializationFeature")
}

pub fn java_time_module() -> TypeReference {
    ty("com.fasterxml.jackson.datatype.jsr310", "JavaTimeModule")
}

pub fn jdk8_module() -> TypeReference {
    ty("com.fasterxml.jackson.datatype.jdk8", "Jdk8Module")
}

/// Nested `JsonSetter.Value`.
pub fn json_setter_value() -> TypeReference {
    ty("com.fasterxml.jackson.annotation", "JsonSetter.Value")
}

pub fn nulls() -> TypeReference {
    ty("com.fasterxml.jackson.annotation", "Nulls")
}

/// Super type token capturing a full generic shape.
pub fn type_token() -> TypeReference {
    ty("com.fasterxml.jackson.core.type", "TypeReference")
}
